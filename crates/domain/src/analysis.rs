// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The multi-section analysis result returned by the remote evaluator.
//!
//! Only section statuses are interpreted locally (see
//! [`crate::classify_analysis`]). The remaining fields are carried through
//! for display.

use serde::{Deserialize, Serialize};

/// Per-section verdict.
///
/// Unrecognized values are preserved verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SectionStatus {
    Ok,
    Warning,
    Completed,
    InProgress,
    Other(String),
}

impl SectionStatus {
    /// Returns the wire representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ok => "OK",
            Self::Warning => "WARNING",
            Self::Completed => "COMPLETED",
            Self::InProgress => "IN_PROGRESS",
            Self::Other(value) => value,
        }
    }
}

impl From<String> for SectionStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "OK" => Self::Ok,
            "WARNING" => Self::Warning,
            "COMPLETED" => Self::Completed,
            "IN_PROGRESS" => Self::InProgress,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for SectionStatus {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<SectionStatus> for String {
    fn from(status: SectionStatus) -> Self {
        match status {
            SectionStatus::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for SectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Data freshness check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FreshnessSection {
    #[serde(default)]
    pub status: Option<SectionStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_ago: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Training trajectory check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySection {
    #[serde(default)]
    pub status: Option<SectionStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Training/role compatibility check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompatibilitySection {
    #[serde(default)]
    pub status: Option<SectionStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training: Option<String>,
}

/// Progress of one skill towards its target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillDetail {
    pub skill: String,
    pub current: f64,
    pub target: f64,
    /// `OK` or `MISSING`.
    pub status: String,
    pub pct: f64,
}

/// Role target check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleTargetsSection {
    #[serde(default)]
    pub status: Option<SectionStatus>,
    /// Ordered, human-readable list of missing skill amounts.
    #[serde(default)]
    pub missing_summary: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_analyzed: Option<String>,
    #[serde(default)]
    pub details: Vec<SkillDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Stamina share check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaminaSection {
    #[serde(default)]
    pub status: Option<SectionStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current: Option<f64>,
}

/// Full analysis response for one player.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(rename = "1_freshness", default, skip_serializing_if = "Option::is_none")]
    pub freshness: Option<FreshnessSection>,
    #[serde(rename = "2_trajectory", default, skip_serializing_if = "Option::is_none")]
    pub trajectory: Option<TrajectorySection>,
    #[serde(rename = "3_compatibility", default, skip_serializing_if = "Option::is_none")]
    pub compatibility: Option<CompatibilitySection>,
    #[serde(rename = "4_role_targets", default, skip_serializing_if = "Option::is_none")]
    pub role_targets: Option<RoleTargetsSection>,
    #[serde(rename = "5_stamina", default, skip_serializing_if = "Option::is_none")]
    pub stamina: Option<StaminaSection>,
}

impl AnalysisResult {
    /// Status of the role target section, if present.
    #[must_use]
    pub fn role_status(&self) -> Option<&SectionStatus> {
        self.role_targets.as_ref().and_then(|s| s.status.as_ref())
    }

    /// Status of the stamina section, if present.
    #[must_use]
    pub fn stamina_status(&self) -> Option<&SectionStatus> {
        self.stamina.as_ref().and_then(|s| s.status.as_ref())
    }

    /// Status of the compatibility section, if present.
    #[must_use]
    pub fn compatibility_status(&self) -> Option<&SectionStatus> {
        self.compatibility.as_ref().and_then(|s| s.status.as_ref())
    }
}
