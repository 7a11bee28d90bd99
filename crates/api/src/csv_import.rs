// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Delimited-text import of player exports.
//!
//! Exports produced by the game differ by locale in their delimiter, so the
//! delimiter is sniffed from the header line. Rows are read into
//! [`RawPlayerRecord`]s without interpretation; normalization happens when
//! payloads are built.

use csv::StringRecord;
use nt_scout_domain::{PLAYER_COLUMNS, RawPlayerRecord};
use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::error::ApiError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Candidate delimiters in tie-break order.
const CANDIDATE_DELIMITERS: [u8; 3] = [b',', b';', b'\t'];

/// A row that could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRowIssue {
    /// The row number (1-based, excluding header).
    pub row_number: usize,
    /// Why the row was skipped.
    pub reason: String,
}

/// Result of importing a player export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvImportResult {
    /// Records in file order.
    pub records: Vec<RawPlayerRecord>,
    /// Rows the reader could not decode.
    pub skipped_rows: Vec<CsvRowIssue>,
}

/// Normalizes a CSV header for case-insensitive matching.
fn normalize_header(header: &str) -> String {
    header.trim().to_ascii_lowercase()
}

/// Picks the most frequent candidate delimiter on the header line.
///
/// Ties go to the earlier candidate, so a header without any delimiter is
/// read as comma separated.
fn sniff_delimiter(content: &[u8]) -> u8 {
    let header_line: &[u8] = content
        .split(|b| *b == b'\n')
        .find(|line| line.iter().any(|b| !b.is_ascii_whitespace()))
        .unwrap_or_default();

    let mut best: (u8, usize) = (CANDIDATE_DELIMITERS[0], 0);
    for candidate in CANDIDATE_DELIMITERS {
        let count: usize = header_line.iter().filter(|b| **b == candidate).count();
        if count > best.1 {
            best = (candidate, count);
        }
    }
    best.0
}

/// Maps header positions to known player columns.
///
/// Returns `(position, column)` pairs for every recognized header.
fn resolve_columns(headers: &StringRecord) -> Result<Vec<(usize, &'static str)>, ApiError> {
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(ApiError::InvalidCsvFormat {
            reason: String::from("Header row is empty"),
        });
    }

    let mut resolved: Vec<(usize, &'static str)> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for (idx, header) in headers.iter().enumerate() {
        let normalized: String = normalize_header(header);
        let known: Option<&'static str> = PLAYER_COLUMNS
            .iter()
            .copied()
            .find(|column| column.to_ascii_lowercase() == normalized);
        let Some(column) = known else {
            debug!(header, position = idx, "Ignoring unknown column");
            continue;
        };
        if seen.insert(normalized) {
            resolved.push((idx, column));
        } else {
            debug!(column, position = idx, "Ignoring duplicate column");
        }
    }

    let missing: Vec<&str> = PLAYER_COLUMNS
        .iter()
        .copied()
        .filter(|column| !seen.contains(&column.to_ascii_lowercase()))
        .collect();
    if !missing.is_empty() {
        warn!(missing = %missing.join(", "), "Player export is missing known columns");
    }

    Ok(resolved)
}

/// Builds a record from one row using the resolved columns.
fn parse_row(row: &StringRecord, columns: &[(usize, &'static str)]) -> RawPlayerRecord {
    let mut record: RawPlayerRecord = RawPlayerRecord::default();
    for (idx, column) in columns {
        if let Some(value) = row.get(*idx) {
            record.set_field(column, value);
        }
    }
    record
}

/// Imports a delimited player export.
///
/// # Arguments
///
/// * `content` - The raw file content
///
/// # Returns
///
/// * `Ok(CsvImportResult)` with one record per non-empty row and the rows
///   that could not be decoded
///
/// # Errors
///
/// Returns `ApiError::InvalidCsvFormat` when the content is empty or the
/// header row cannot be read.
pub fn import_player_csv(content: &[u8]) -> Result<CsvImportResult, ApiError> {
    let content: &[u8] = content.strip_prefix(UTF8_BOM).unwrap_or(content);
    if content.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::InvalidCsvFormat {
            reason: String::from("CSV content is empty"),
        });
    }

    let delimiter: u8 = sniff_delimiter(content);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(content);

    let headers: StringRecord = reader
        .headers()
        .map_err(|e| ApiError::InvalidCsvFormat {
            reason: format!("Failed to read CSV headers: {e}"),
        })?
        .clone();
    let columns: Vec<(usize, &'static str)> = resolve_columns(&headers)?;

    let mut result: CsvImportResult = CsvImportResult::default();
    for (idx, row) in reader.records().enumerate() {
        let row_number: usize = idx + 1;
        match row {
            Ok(row) if row.iter().all(|cell| cell.trim().is_empty()) => {}
            Ok(row) => result.records.push(parse_row(&row, &columns)),
            Err(e) => {
                warn!(row_number, error = %e, "Skipping unreadable CSV row");
                result.skipped_rows.push(CsvRowIssue {
                    row_number,
                    reason: format!("CSV parse error: {e}"),
                });
            }
        }
    }

    info!(
        delimiter = %char::from(delimiter).escape_default(),
        records = result.records.len(),
        skipped = result.skipped_rows.len(),
        "Imported player export"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_delimiter() {
        assert_eq!(sniff_delimiter(b"PlayerID,FirstName,LastName\n1,a,b"), b',');
        assert_eq!(sniff_delimiter(b"PlayerID;FirstName;Last,Name\n"), b';');
        assert_eq!(sniff_delimiter(b"PlayerID\tFirstName\n"), b'\t');
        assert_eq!(sniff_delimiter(b"\n\nPlayerID;FirstName\n"), b';');
        assert_eq!(sniff_delimiter(b"PlayerID\n"), b',');
        assert_eq!(sniff_delimiter(b"A,B;C\n"), b',');
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("  PlayerID "), "playerid");
        assert_eq!(normalize_header("STAMINATRAININGPART"), "staminatrainingpart");
    }
}
