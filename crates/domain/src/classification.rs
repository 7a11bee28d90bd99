// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Collapses a multi-section analysis into a single display status.

use crate::analysis::{AnalysisResult, SectionStatus};
use crate::player::EvaluationStatus;

/// Classifies an analysis result as `Success`, `Warning` or `Error`.
///
/// See [`classify_section_statuses`] for the rule.
#[must_use]
pub fn classify_analysis(result: &AnalysisResult) -> EvaluationStatus {
    classify_section_statuses(
        result.role_status(),
        result.stamina_status(),
        result.compatibility_status(),
    )
}

/// Applies the aggregate status rule to the three interpreted sections.
///
/// Evaluated in priority order:
/// - `Success` when role is `COMPLETED`, stamina is `OK` and compatibility is `OK`
/// - `Warning` when role is `IN_PROGRESS`, or stamina or compatibility is `WARNING`
/// - `Error` otherwise
///
/// A missing status matches neither of the first two rules.
#[must_use]
pub fn classify_section_statuses(
    role: Option<&SectionStatus>,
    stamina: Option<&SectionStatus>,
    compatibility: Option<&SectionStatus>,
) -> EvaluationStatus {
    let is = |status: Option<&SectionStatus>, expected: &SectionStatus| status == Some(expected);

    if is(role, &SectionStatus::Completed)
        && is(stamina, &SectionStatus::Ok)
        && is(compatibility, &SectionStatus::Ok)
    {
        EvaluationStatus::Success
    } else if is(role, &SectionStatus::InProgress)
        || is(stamina, &SectionStatus::Warning)
        || is(compatibility, &SectionStatus::Warning)
    {
        EvaluationStatus::Warning
    } else {
        EvaluationStatus::Error
    }
}
