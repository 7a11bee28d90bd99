// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Player records, evaluation parameters and the canonical evaluation payload.

use crate::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// Canonical column names of a player export, in export order.
///
/// Header matching is case-insensitive; see [`RawPlayerRecord::set_field`].
pub const PLAYER_COLUMNS: &[&str] = &[
    "PlayerID",
    "FirstName",
    "LastName",
    "NickName",
    "Age",
    "AgeDays",
    "Updated",
    "PlayerCategoryName",
    "PositionCode",
    "TrainingType",
    "TrainingName",
    "StaminaTrainingPart",
    "LastScoutNote",
    "TransferListed",
    "TeamTrainerSkill",
    "OwningUserID",
    "KeeperSkill",
    "PlaymakerSkill",
    "ScorerSkill",
    "PassingSkill",
    "WingerSkill",
    "DefenderSkill",
    "SetPiecesSkill",
];

/// A player row as it arrives from a file import or the remote data store.
///
/// All fields are kept as text. Remote objects may carry numbers or booleans
/// for some fields; those are accepted and stored in their textual form.
/// Blank values are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawPlayerRecord {
    #[serde(rename = "PlayerID", default, deserialize_with = "lenient_text")]
    pub player_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub nick_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub age: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub age_days: Option<String>,
    /// Last update timestamp, locale formatted or ISO.
    #[serde(default, deserialize_with = "lenient_text")]
    pub updated: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub player_category_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub position_code: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub training_type: Option<String>,
    /// Free-text, localized training designation.
    #[serde(default, deserialize_with = "lenient_text")]
    pub training_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub stamina_training_part: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub last_scout_note: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub transfer_listed: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub team_trainer_skill: Option<String>,
    #[serde(rename = "OwningUserID", default, deserialize_with = "lenient_text")]
    pub owning_user_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub keeper_skill: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub playmaker_skill: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub scorer_skill: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub passing_skill: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub winger_skill: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub defender_skill: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub set_pieces_skill: Option<String>,
}

/// Accepts strings, numbers and booleans, keeping their textual form.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    let text: Option<String> = match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    };
    Ok(text.filter(|s| !s.trim().is_empty()))
}

impl RawPlayerRecord {
    /// Assigns a field by its column name, ignoring case and surrounding
    /// whitespace.
    ///
    /// Blank values leave the field absent. Returns `false` when the column
    /// is not a known player column.
    pub fn set_field(&mut self, column: &str, value: &str) -> bool {
        let value: Option<String> = Some(value.trim().to_string()).filter(|v| !v.is_empty());
        let slot: &mut Option<String> = match column.trim().to_ascii_lowercase().as_str() {
            "playerid" => &mut self.player_id,
            "firstname" => &mut self.first_name,
            "lastname" => &mut self.last_name,
            "nickname" => &mut self.nick_name,
            "age" => &mut self.age,
            "agedays" => &mut self.age_days,
            "updated" => &mut self.updated,
            "playercategoryname" => &mut self.player_category_name,
            "positioncode" => &mut self.position_code,
            "trainingtype" => &mut self.training_type,
            "trainingname" => &mut self.training_name,
            "staminatrainingpart" => &mut self.stamina_training_part,
            "lastscoutnote" => &mut self.last_scout_note,
            "transferlisted" => &mut self.transfer_listed,
            "teamtrainerskill" => &mut self.team_trainer_skill,
            "owninguserid" => &mut self.owning_user_id,
            "keeperskill" => &mut self.keeper_skill,
            "playmakerskill" => &mut self.playmaker_skill,
            "scorerskill" => &mut self.scorer_skill,
            "passingskill" => &mut self.passing_skill,
            "wingerskill" => &mut self.winger_skill,
            "defenderskill" => &mut self.defender_skill,
            "setpiecesskill" => &mut self.set_pieces_skill,
            _ => return false,
        };
        *slot = value;
        true
    }

    /// Returns the player identifier, if the record carries a non-blank one.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.player_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// Returns `"<first> <last>"`, trimmed.
    #[must_use]
    pub fn full_name(&self) -> String {
        let first: &str = self.first_name.as_deref().unwrap_or_default();
        let last: &str = self.last_name.as_deref().unwrap_or_default();
        format!("{first} {last}").trim().to_string()
    }
}

/// The user-selected evaluation context.
///
/// The role always overrides whatever position the raw record implies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationParameters {
    /// Player role, e.g. `midfielder`.
    pub role: String,
    /// Target group, e.g. `U21` or `NT`.
    pub target: String,
    /// Tactical variant, e.g. `Normal`.
    pub variant: String,
}

impl EvaluationParameters {
    /// Creates parameters from explicit values.
    #[must_use]
    pub fn new(role: &str, target: &str, variant: &str) -> Self {
        Self {
            role: role.to_string(),
            target: target.to_string(),
            variant: variant.to_string(),
        }
    }
}

impl Default for EvaluationParameters {
    fn default() -> Self {
        Self::new("midfielder", "U21", "Normal")
    }
}

/// Canonical training discipline tags.
///
/// Deserialization goes through [`FromStr`], so only the exact canonical
/// tags are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum TrainingType {
    #[serde(rename = "goalkeeping")]
    Goalkeeping,
    #[serde(rename = "defending")]
    Defending,
    #[serde(rename = "playmaking")]
    Playmaking,
    #[serde(rename = "winger")]
    Winger,
    #[serde(rename = "passing")]
    Passing,
    #[serde(rename = "scoring")]
    Scoring,
    #[serde(rename = "set pieces")]
    SetPieces,
    #[serde(rename = "unknown")]
    Unknown,
}

impl TrainingType {
    /// Returns the canonical tag.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Goalkeeping => "goalkeeping",
            Self::Defending => "defending",
            Self::Playmaking => "playmaking",
            Self::Winger => "winger",
            Self::Passing => "passing",
            Self::Scoring => "scoring",
            Self::SetPieces => "set pieces",
            Self::Unknown => "unknown",
        }
    }
}

impl FromStr for TrainingType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "goalkeeping" => Ok(Self::Goalkeeping),
            "defending" => Ok(Self::Defending),
            "playmaking" => Ok(Self::Playmaking),
            "winger" => Ok(Self::Winger),
            "passing" => Ok(Self::Passing),
            "scoring" => Ok(Self::Scoring),
            "set pieces" => Ok(Self::SetPieces),
            "unknown" => Ok(Self::Unknown),
            _ => Err(DomainError::InvalidTrainingType(s.to_string())),
        }
    }
}

impl TryFrom<String> for TrainingType {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::fmt::Display for TrainingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Current skill levels keyed by the seven fixed discipline names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillSet {
    pub goalkeeping: i64,
    pub playmaking: i64,
    pub scoring: i64,
    pub passing: i64,
    pub winger: i64,
    pub defending: i64,
    #[serde(rename = "set pieces")]
    pub set_pieces: i64,
}

/// A normalized evaluation request for one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalPayload {
    /// `YYYY-MM-DDTHH:MM:SS`, no fraction or zone suffix.
    pub last_update: String,
    /// Years plus day fraction, two decimals.
    pub player_age: f64,
    pub player_role: String,
    pub team_target: String,
    pub role_variant: String,
    pub training_type: TrainingType,
    /// Stamina share as an integer percentage.
    pub stamina_share: i64,
    pub current_skills: SkillSet,
}

/// Lifecycle status of a player evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum EvaluationStatus {
    Pending,
    Loading,
    Success,
    Warning,
    Error,
}

impl EvaluationStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Loading => "LOADING",
            Self::Success => "SUCCESS",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }

    /// Returns true once an evaluation round has settled.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Warning | Self::Error)
    }
}

impl FromStr for EvaluationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "LOADING" => Ok(Self::Loading),
            "SUCCESS" => Ok(Self::Success),
            "WARNING" => Ok(Self::Warning),
            "ERROR" => Ok(Self::Error),
            _ => Err(DomainError::InvalidEvaluationStatus(s.to_string())),
        }
    }
}

impl TryFrom<String> for EvaluationStatus {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, DomainError> {
        value.parse()
    }
}

impl std::fmt::Display for EvaluationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
