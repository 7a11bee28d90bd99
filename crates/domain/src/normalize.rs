// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Field normalization for raw player data.
//!
//! Every function here is total: malformed input yields a documented
//! default rather than an error, and unrecognized timestamps are reported
//! through a `warn!` diagnostic.

use crate::player::TrainingType;
use regex::Regex;
use std::sync::LazyLock;
use time::OffsetDateTime;
use tracing::warn;

/// Days in one in-game age year.
pub const DAYS_PER_AGE_YEAR: f64 = 112.0;

/// Age in years assumed when the years field cannot be parsed.
///
/// A parsed `0` is kept as `0`; the default applies only to unparseable
/// input. Older exports replaced a literal zero with the default as well.
pub const DEFAULT_AGE_YEARS: i64 = 17;

/// Stamina share (percent) assumed when the field cannot be parsed.
///
/// A parsed `0` is a real "no stamina training" share and is kept; unlike
/// older exports, it is not replaced with this default.
pub const DEFAULT_STAMINA_SHARE: i64 = 15;

static DATE_TIME_DMY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{2})/([0-9]{2})/([0-9]{4})\s+([0-9]{2}):([0-9]{2}):([0-9]{2})$")
        .unwrap_or_else(|e| unreachable!("invalid date-time pattern: {e}"))
});

static DATE_DMY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{2})/([0-9]{2})/([0-9]{4})$")
        .unwrap_or_else(|e| unreachable!("invalid date pattern: {e}"))
});

static ISO_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}")
        .unwrap_or_else(|e| unreachable!("invalid ISO pattern: {e}"))
});

/// Training label fragments, checked in order; the first hit wins.
const TRAINING_RULES: &[(&[&str], TrainingType)] = &[
    (&["parat", "goalk", "goaltendin"], TrainingType::Goalkeeping),
    (&["difes", "defen"], TrainingType::Defending),
    (&["regia", "playma"], TrainingType::Playmaking),
    (&["cross", "winger"], TrainingType::Winger),
    (&["passag", "passing", "short passe"], TrainingType::Passing),
    (&["attac", "scoring"], TrainingType::Scoring),
    (&["piazzat", "setpi", "set pieces"], TrainingType::SetPieces),
];

/// Parses the leading base-10 integer of `value`.
///
/// Leading whitespace and a sign are accepted and trailing garbage is
/// ignored, so `"12abc"` and `"12.7"` both give 12. Returns `None` when no
/// digit follows the optional sign.
#[must_use]
pub fn parse_leading_int(value: &str) -> Option<i64> {
    let trimmed: &str = value.trim_start();
    let (negative, rest): (bool, &str) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_len: usize = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    let magnitude: i64 = rest[..digits_len].parse::<i64>().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Parses an integer field, falling back to `default` when absent or
/// unparseable.
#[must_use]
pub fn parse_int_or(value: Option<&str>, default: i64) -> i64 {
    value.and_then(parse_leading_int).unwrap_or(default)
}

/// Parses a decimal value that may use a comma as decimal separator.
///
/// Only the first comma is treated as the separator. The longest numeric
/// prefix is used; absent or unparseable input gives `0.0`.
#[must_use]
pub fn parse_locale_decimal(value: Option<&str>) -> f64 {
    let Some(raw) = value else {
        return 0.0;
    };
    let text: String = raw.trim().replacen(',', ".", 1);
    let bytes: &[u8] = text.as_bytes();

    let mut end: usize = 0;
    if matches!(bytes.first(), Some(b'-' | b'+')) {
        end = 1;
    }
    let int_digits: usize = bytes[end..].iter().take_while(|b| b.is_ascii_digit()).count();
    end += int_digits;
    let mut frac_digits: usize = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = bytes[end + 1..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if int_digits + frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits + frac_digits == 0 {
        return 0.0;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end: usize = end + 1;
        if matches!(bytes.get(exp_end), Some(b'-' | b'+')) {
            exp_end += 1;
        }
        let exp_digits: usize = bytes[exp_end.min(bytes.len())..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    text[..end].parse::<f64>().unwrap_or(0.0)
}

/// Computes a player's age as years plus the fraction of an age year.
///
/// Years default to 17 and days to 0 when unparseable. The result is
/// rounded to two decimals.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn compute_age(years: &str, days: &str) -> f64 {
    let years: i64 = parse_int_or(Some(years), DEFAULT_AGE_YEARS);
    let days: i64 = parse_int_or(Some(days), 0);
    let age: f64 = years as f64 + days as f64 / DAYS_PER_AGE_YEAR;
    (age * 100.0).round() / 100.0
}

/// Normalizes a last-update timestamp to `YYYY-MM-DDTHH:MM:SS`.
///
/// Accepted shapes, tried in order:
/// 1. `DD/MM/YYYY HH:MM:SS`
/// 2. `DD/MM/YYYY` (midnight is assumed)
/// 3. anything starting with `YYYY-MM-DD`; the first space becomes `T`
///
/// Anything else, including empty input, yields the current UTC time
/// truncated to whole seconds.
#[must_use]
pub fn normalize_date(raw: &str) -> String {
    normalize_date_at(raw, OffsetDateTime::now_utc())
}

/// Same as [`normalize_date`], with an explicit fallback instant.
#[must_use]
pub fn normalize_date_at(raw: &str, now: OffsetDateTime) -> String {
    let clean: &str = raw.trim();

    if let Some(caps) = DATE_TIME_DMY.captures(clean) {
        return format!(
            "{}-{}-{}T{}:{}:{}",
            &caps[3], &caps[2], &caps[1], &caps[4], &caps[5], &caps[6]
        );
    }

    if let Some(caps) = DATE_DMY.captures(clean) {
        return format!("{}-{}-{}T00:00:00", &caps[3], &caps[2], &caps[1]);
    }

    if ISO_PREFIX.is_match(clean) {
        return clean.replacen(' ', "T", 1);
    }

    warn!(input = %clean, "Unrecognized update timestamp, using current time");
    format_instant(now)
}

/// Formats an instant as `YYYY-MM-DDTHH:MM:SS` in UTC, dropping any fraction.
#[must_use]
pub fn format_instant(instant: OffsetDateTime) -> String {
    let utc: OffsetDateTime = instant.to_offset(time::UtcOffset::UTC);
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
        utc.year(),
        u8::from(utc.month()),
        utc.day(),
        utc.hour(),
        utc.minute(),
        utc.second()
    )
}

/// Maps a free-text, bilingual training label to its canonical tag.
///
/// Matching is a case-insensitive substring search against Italian and
/// English fragments.
#[must_use]
pub fn classify_training(label: &str) -> TrainingType {
    let lowered: String = label.to_lowercase();
    TRAINING_RULES
        .iter()
        .find(|(fragments, _)| fragments.iter().any(|f| lowered.contains(f)))
        .map_or(TrainingType::Unknown, |(_, tag)| *tag)
}
