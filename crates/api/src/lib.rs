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
    clippy::unwrap_used,
    clippy::expect_used
)]

//! Edges of NT Scout: delimited-text ingestion and the remote service
//! client used for evaluation, player lists and user targets.

mod client;
mod csv_import;
mod error;

#[cfg(test)]
mod tests;

pub use client::{ClientConfig, RemoteClient};
pub use csv_import::{CsvImportResult, CsvRowIssue, import_player_csv};
pub use error::{ApiError, ClientError};
