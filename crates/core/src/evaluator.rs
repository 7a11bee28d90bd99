// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::EvaluationError;
use nt_scout_domain::{AnalysisResult, CanonicalPayload};
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Body of one evaluation call: the canonical payload plus the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    #[serde(flatten)]
    pub payload: CanonicalPayload,
    /// Identity (e-mail) of the user requesting the evaluation.
    pub email: String,
}

impl EvaluationRequest {
    /// Creates a request for `payload` on behalf of `caller`.
    #[must_use]
    pub fn new(payload: CanonicalPayload, caller: &str) -> Self {
        Self {
            payload,
            email: caller.to_string(),
        }
    }
}

/// The external analysis function.
///
/// Implementations perform one request/response exchange per call and must
/// not retry; the orchestrator owns failure handling.
pub trait Evaluator: Send + Sync + 'static {
    /// Evaluates one player.
    fn evaluate(
        &self,
        request: EvaluationRequest,
    ) -> impl Future<Output = Result<AnalysisResult, EvaluationError>> + Send;
}
