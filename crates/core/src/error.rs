// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use thiserror::Error;

/// Failure of a single evaluation call.
///
/// The orchestrator treats every variant the same way: the entry is marked
/// `ERROR` with a fixed message. The variants exist for diagnostics.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EvaluationError {
    /// The request never produced a response.
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The evaluator answered with a non-success status.
    #[error("Evaluator rejected the request with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("Invalid evaluator response: {0}")]
    InvalidResponse(String),
}
