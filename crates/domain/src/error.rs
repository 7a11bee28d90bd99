// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur when parsing domain vocabularies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A training tag is not one of the eight canonical tags.
    InvalidTrainingType(String),
    /// An evaluation status string is not recognized.
    InvalidEvaluationStatus(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTrainingType(tag) => write!(f, "Invalid training type: '{tag}'"),
            Self::InvalidEvaluationStatus(status) => {
                write!(f, "Invalid evaluation status: '{status}'")
            }
        }
    }
}

impl std::error::Error for DomainError {}
