// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use nt_scout_domain::{
    CanonicalPayload, DEFAULT_STAMINA_SHARE, EvaluationParameters, RawPlayerRecord, SkillSet,
    classify_training, compute_age, normalize_date, parse_int_or,
};

/// Builds the canonical evaluation payload for one raw record.
///
/// Role, target and variant are taken from `parameters` verbatim; the
/// record's own category and position fields never influence the role.
///
/// # Arguments
///
/// * `record` - The raw player record
/// * `parameters` - The user-selected evaluation context
///
/// # Returns
///
/// * `Some(CanonicalPayload)` for any record carrying a player identifier
/// * `None` when the identifier is missing or blank, meaning "skip"
#[must_use]
pub fn build_payload(
    record: &RawPlayerRecord,
    parameters: &EvaluationParameters,
) -> Option<CanonicalPayload> {
    record.id()?;

    let skill = |value: &Option<String>| -> i64 { parse_int_or(value.as_deref(), 0) };

    Some(CanonicalPayload {
        last_update: normalize_date(record.updated.as_deref().unwrap_or_default()),
        player_age: compute_age(
            record.age.as_deref().unwrap_or_default(),
            record.age_days.as_deref().unwrap_or_default(),
        ),
        player_role: parameters.role.clone(),
        team_target: parameters.target.clone(),
        role_variant: parameters.variant.clone(),
        training_type: classify_training(record.training_name.as_deref().unwrap_or_default()),
        stamina_share: parse_int_or(
            record.stamina_training_part.as_deref(),
            DEFAULT_STAMINA_SHARE,
        ),
        current_skills: SkillSet {
            goalkeeping: skill(&record.keeper_skill),
            playmaking: skill(&record.playmaker_skill),
            scoring: skill(&record.scorer_skill),
            passing: skill(&record.passing_skill),
            winger: skill(&record.winger_skill),
            defending: skill(&record.defender_skill),
            set_pieces: skill(&record.set_pieces_skill),
        },
    })
}
