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

mod error;
mod evaluator;
mod events;
mod orchestrator;
mod payload;
mod state;

#[cfg(test)]
mod tests;

pub use error::EvaluationError;
pub use evaluator::{EvaluationRequest, Evaluator};
pub use events::{BatchEvent, BatchEventBroadcaster};
pub use orchestrator::{BatchOrchestrator, BatchRun, CONNECTION_ERROR_MESSAGE};
pub use payload::build_payload;
pub use state::{BatchSnapshot, PlayerEvaluationEntry, PlayerMetadata};
