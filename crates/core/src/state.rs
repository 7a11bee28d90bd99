// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use nt_scout_domain::{
    AnalysisResult, CanonicalPayload, EvaluationParameters, EvaluationStatus, RawPlayerRecord,
    TrainingType,
};
use serde::{Deserialize, Serialize};

/// Original record metadata echoed for display only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerMetadata {
    /// The raw, un-normalized update timestamp.
    pub last_update: Option<String>,
    pub age: Option<String>,
    pub age_days: Option<String>,
    pub last_scout_note: Option<String>,
    pub transfer_listed: Option<String>,
    pub team_trainer_skill: Option<String>,
    pub owning_user_id: Option<String>,
}

impl From<&RawPlayerRecord> for PlayerMetadata {
    fn from(record: &RawPlayerRecord) -> Self {
        Self {
            last_update: record.updated.clone(),
            age: record.age.clone(),
            age_days: record.age_days.clone(),
            last_scout_note: record.last_scout_note.clone(),
            transfer_listed: record.transfer_listed.clone(),
            team_trainer_skill: record.team_trainer_skill.clone(),
            owning_user_id: record.owning_user_id.clone(),
        }
    }
}

/// Observable evaluation state of one player in the current batch.
///
/// Entries are owned by the orchestrator and settle exactly once per
/// batch generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerEvaluationEntry {
    pub id: String,
    pub full_name: String,
    pub status: EvaluationStatus,
    pub training_type: TrainingType,
    /// Stamina share sent for evaluation, in percent.
    pub stamina: i64,
    pub metadata: PlayerMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PlayerEvaluationEntry {
    /// Creates an entry awaiting its evaluation response.
    #[must_use]
    pub fn loading(id: &str, record: &RawPlayerRecord, payload: &CanonicalPayload) -> Self {
        Self {
            id: id.to_string(),
            full_name: record.full_name(),
            status: EvaluationStatus::Loading,
            training_type: payload.training_type,
            stamina: payload.stamina_share,
            metadata: PlayerMetadata::from(record),
            analysis: None,
            error: None,
        }
    }
}

/// Point-in-time copy of the orchestrator's batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSnapshot {
    /// Generation of the batch the entries belong to. Zero before any run.
    pub generation: u64,
    pub parameters: EvaluationParameters,
    /// Number of source records currently loaded.
    pub source_records: usize,
    pub entries: Vec<PlayerEvaluationEntry>,
}

impl BatchSnapshot {
    /// Number of entries that have not yet settled.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| !e.status.is_terminal())
            .count()
    }

    /// Number of entries with the given status.
    #[must_use]
    pub fn count_with_status(&self, status: EvaluationStatus) -> usize {
        self.entries.iter().filter(|e| e.status == status).count()
    }
}
