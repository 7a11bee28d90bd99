// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod analysis;
mod classification;
mod error;
mod normalize;
mod options;
mod player;

pub use analysis::{
    AnalysisResult, CompatibilitySection, FreshnessSection, RoleTargetsSection, SectionStatus,
    SkillDetail, StaminaSection, TrajectorySection,
};
pub use classification::{classify_analysis, classify_section_statuses};
pub use error::DomainError;
pub use normalize::{
    DAYS_PER_AGE_YEAR, DEFAULT_AGE_YEARS, DEFAULT_STAMINA_SHARE, classify_training, compute_age,
    format_instant, normalize_date, normalize_date_at, parse_int_or, parse_leading_int,
    parse_locale_decimal,
};
pub use options::{
    BUILT_IN_VARIANTS, DEFAULT_TARGETS, DEFAULT_VARIANTS, EvaluationOptions, RoleOption,
    UserTarget, role_options,
};
pub use player::{
    CanonicalPayload, EvaluationParameters, EvaluationStatus, PLAYER_COLUMNS, RawPlayerRecord,
    SkillSet, TrainingType,
};
