// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{EvaluationError, EvaluationRequest, Evaluator};
use nt_scout_domain::{
    AnalysisResult, CompatibilitySection, RawPlayerRecord, RoleTargetsSection, SectionStatus,
    StaminaSection,
};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

pub fn create_test_record(player_id: &str, first_name: &str, last_name: &str) -> RawPlayerRecord {
    RawPlayerRecord {
        player_id: Some(player_id.to_string()),
        first_name: Some(first_name.to_string()),
        last_name: Some(last_name.to_string()),
        age: Some(String::from("19")),
        age_days: Some(String::from("56")),
        updated: Some(String::from("22/12/2025 06:52:51")),
        training_name: Some(String::from("Regia")),
        stamina_training_part: Some(String::from("12")),
        playmaker_skill: Some(String::from("14")),
        passing_skill: Some(String::from("6")),
        defender_skill: Some(String::from("6")),
        ..RawPlayerRecord::default()
    }
}

pub fn create_record_without_id(first_name: &str) -> RawPlayerRecord {
    RawPlayerRecord {
        player_id: None,
        first_name: Some(first_name.to_string()),
        ..RawPlayerRecord::default()
    }
}

pub fn create_analysis(role: &str, stamina: &str, compatibility: &str) -> AnalysisResult {
    AnalysisResult {
        role_targets: Some(RoleTargetsSection {
            status: Some(SectionStatus::from(role)),
            ..RoleTargetsSection::default()
        }),
        stamina: Some(StaminaSection {
            status: Some(SectionStatus::from(stamina)),
            ..StaminaSection::default()
        }),
        compatibility: Some(CompatibilitySection {
            status: Some(SectionStatus::from(compatibility)),
            ..CompatibilitySection::default()
        }),
        ..AnalysisResult::default()
    }
}

/// Answers every request with the same analysis and records what it saw.
pub struct StaticEvaluator {
    pub response: AnalysisResult,
    pub seen: Arc<Mutex<Vec<EvaluationRequest>>>,
}

impl StaticEvaluator {
    pub fn new(response: AnalysisResult) -> Self {
        Self {
            response,
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl Evaluator for StaticEvaluator {
    async fn evaluate(&self, request: EvaluationRequest) -> Result<AnalysisResult, EvaluationError> {
        self.seen.lock().unwrap().push(request);
        Ok(self.response.clone())
    }
}

/// Fails calls whose playmaking skill matches and completes all others.
pub struct FailingEvaluator {
    pub failing_playmaking: i64,
}

impl Evaluator for FailingEvaluator {
    async fn evaluate(&self, request: EvaluationRequest) -> Result<AnalysisResult, EvaluationError> {
        if request.payload.current_skills.playmaking == self.failing_playmaking {
            return Err(EvaluationError::Transport(String::from("connection refused")));
        }
        Ok(create_analysis("COMPLETED", "OK", "OK"))
    }
}

/// Holds calls for `gated_role` until permits are added to `gate`.
///
/// Gated calls answer `COMPLETED/OK/OK`; all other calls answer
/// `IN_PROGRESS/OK/OK` immediately.
pub struct GatedEvaluator {
    pub gated_role: String,
    pub gate: Arc<Semaphore>,
}

impl GatedEvaluator {
    pub fn new(gated_role: &str) -> Self {
        Self {
            gated_role: gated_role.to_string(),
            gate: Arc::new(Semaphore::new(0)),
        }
    }
}

impl Evaluator for GatedEvaluator {
    async fn evaluate(&self, request: EvaluationRequest) -> Result<AnalysisResult, EvaluationError> {
        if request.payload.player_role == self.gated_role {
            let _permit = self
                .gate
                .acquire()
                .await
                .map_err(|e| EvaluationError::Transport(e.to_string()))?;
            return Ok(create_analysis("COMPLETED", "OK", "OK"));
        }
        Ok(create_analysis("IN_PROGRESS", "OK", "OK"))
    }
}

/// Panics instead of answering.
pub struct PanickingEvaluator;

impl Evaluator for PanickingEvaluator {
    async fn evaluate(&self, request: EvaluationRequest) -> Result<AnalysisResult, EvaluationError> {
        panic!(
            "evaluator crashed on role {}",
            request.payload.player_role
        );
    }
}
