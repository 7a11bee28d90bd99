// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use nt_scout::EvaluationError;
use thiserror::Error;

/// Failures talking to the remote service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Build(String),

    /// The request failed before a response arrived.
    #[error("Request to remote service failed: {0}")]
    Transport(String),

    /// The remote service answered with a non-success status.
    #[error("Remote service returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not the expected JSON.
    #[error("Failed to decode remote response: {0}")]
    Decode(String),
}

impl From<ClientError> for EvaluationError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Build(reason) | ClientError::Transport(reason) => Self::Transport(reason),
            ClientError::Status { status, body } => Self::Rejected {
                status,
                message: body,
            },
            ClientError::Decode(reason) => Self::InvalidResponse(reason),
        }
    }
}

/// API-level errors.
///
/// These are surfaced to callers of the ingestion and fetch operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The delimited text could not be read as a player export.
    InvalidCsvFormat {
        /// Why the content was rejected.
        reason: String,
    },
    /// Fetching data from the remote service failed.
    RemoteFetch {
        /// The underlying client failure.
        reason: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCsvFormat { reason } => write!(f, "Invalid CSV format: {reason}"),
            Self::RemoteFetch { reason } => write!(f, "Remote fetch failed: {reason}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        Self::RemoteFetch {
            reason: err.to_string(),
        }
    }
}
