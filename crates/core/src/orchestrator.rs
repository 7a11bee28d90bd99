// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Batch evaluation orchestration.
//!
//! The orchestrator owns the loaded source records, the current evaluation
//! parameters and the visible entries. Any new source batch or parameter
//! change discards the entries and re-evaluates every record from scratch.
//!
//! Each run bumps a generation counter. Evaluation calls are spawned
//! concurrently and carry the generation they were issued for; a response
//! arriving after its generation was superseded is dropped.

use crate::error::EvaluationError;
use crate::evaluator::{EvaluationRequest, Evaluator};
use crate::events::{BatchEvent, BatchEventBroadcaster};
use crate::payload::build_payload;
use crate::state::{BatchSnapshot, PlayerEvaluationEntry};
use nt_scout_domain::{
    AnalysisResult, EvaluationParameters, EvaluationStatus, RawPlayerRecord, classify_analysis,
};
use std::sync::Arc;
use tokio::sync::{Mutex, broadcast};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Message shown on an entry whose evaluation call failed.
///
/// The message is fixed and in Italian, the language of the rest of the
/// user-facing text (see the role labels in `nt_scout_domain::role_options`).
pub const CONNECTION_ERROR_MESSAGE: &str = "Errore di connessione al server";

#[derive(Debug, Default)]
struct BatchState {
    generation: u64,
    parameters: EvaluationParameters,
    records: Vec<RawPlayerRecord>,
    entries: Vec<PlayerEvaluationEntry>,
}

/// Handle on the evaluation calls dispatched by one batch run.
///
/// Dropping the handle does not cancel anything; calls keep running and
/// apply their results if their generation is still current.
#[derive(Debug)]
pub struct BatchRun {
    generation: u64,
    handles: Vec<JoinHandle<bool>>,
}

impl BatchRun {
    /// The generation this run was issued for.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of evaluation calls dispatched.
    #[must_use]
    pub fn dispatched(&self) -> usize {
        self.handles.len()
    }

    /// Waits for every dispatched call to finish.
    ///
    /// Returns how many responses were applied to entries; responses for a
    /// superseded generation are not counted.
    pub async fn settled(self) -> usize {
        let mut applied: usize = 0;
        for handle in self.handles {
            match handle.await {
                Ok(true) => applied += 1,
                Ok(false) => {}
                Err(e) => warn!(generation = self.generation, error = %e, "Evaluation task failed"),
            }
        }
        applied
    }
}

/// Owner of the current evaluation batch.
pub struct BatchOrchestrator<E: Evaluator> {
    evaluator: Arc<E>,
    caller: String,
    state: Arc<Mutex<BatchState>>,
    events: BatchEventBroadcaster,
}

impl<E: Evaluator> BatchOrchestrator<E> {
    /// Creates an orchestrator with default parameters and no records.
    ///
    /// # Arguments
    ///
    /// * `evaluator` - The external analysis function
    /// * `caller` - Identity sent along with every evaluation request
    #[must_use]
    pub fn new(evaluator: E, caller: &str) -> Self {
        Self::with_parameters(evaluator, caller, EvaluationParameters::default())
    }

    /// Creates an orchestrator with explicit initial parameters.
    #[must_use]
    pub fn with_parameters(evaluator: E, caller: &str, parameters: EvaluationParameters) -> Self {
        Self {
            evaluator: Arc::new(evaluator),
            caller: caller.to_string(),
            state: Arc::new(Mutex::new(BatchState {
                parameters,
                ..BatchState::default()
            })),
            events: BatchEventBroadcaster::new(),
        }
    }

    /// Subscribes to batch events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<BatchEvent> {
        self.events.subscribe()
    }

    /// Replaces the source records and re-evaluates the whole batch.
    ///
    /// Records without a player identifier are skipped. An empty batch
    /// leaves no entries.
    pub async fn load_batch(&self, records: Vec<RawPlayerRecord>) -> BatchRun {
        let mut state = self.state.lock().await;
        state.records = records;
        self.start_run(&mut state)
    }

    /// Applies `update` to the current parameters under the batch lock.
    ///
    /// Returns the parameters now in effect, and the new run when they
    /// changed and records are loaded. Unchanged parameters or an empty
    /// batch start nothing.
    pub async fn update_parameters<F>(&self, update: F) -> (EvaluationParameters, Option<BatchRun>)
    where
        F: FnOnce(&mut EvaluationParameters),
    {
        let mut state = self.state.lock().await;
        let mut parameters: EvaluationParameters = state.parameters.clone();
        update(&mut parameters);
        if state.parameters == parameters {
            return (parameters, None);
        }
        info!(
            role = %parameters.role,
            target = %parameters.target,
            variant = %parameters.variant,
            "Evaluation parameters changed"
        );
        state.parameters = parameters.clone();
        if state.records.is_empty() {
            return (parameters, None);
        }
        (parameters, Some(self.start_run(&mut state)))
    }

    /// Replaces the evaluation parameters. See [`Self::update_parameters`].
    pub async fn set_parameters(&self, parameters: EvaluationParameters) -> Option<BatchRun> {
        self.update_parameters(|current| *current = parameters)
            .await
            .1
    }

    /// Changes the role override. See [`Self::update_parameters`].
    pub async fn set_role(&self, role: &str) -> Option<BatchRun> {
        self.update_parameters(|current| role.clone_into(&mut current.role))
            .await
            .1
    }

    /// Changes the target group. See [`Self::update_parameters`].
    pub async fn set_target(&self, target: &str) -> Option<BatchRun> {
        self.update_parameters(|current| target.clone_into(&mut current.target))
            .await
            .1
    }

    /// Changes the tactical variant. See [`Self::update_parameters`].
    pub async fn set_variant(&self, variant: &str) -> Option<BatchRun> {
        self.update_parameters(|current| variant.clone_into(&mut current.variant))
            .await
            .1
    }

    /// Re-evaluates the loaded records with the current parameters.
    pub async fn rerun(&self) -> BatchRun {
        let mut state = self.state.lock().await;
        self.start_run(&mut state)
    }

    /// Returns the current parameters.
    pub async fn parameters(&self) -> EvaluationParameters {
        self.state.lock().await.parameters.clone()
    }

    /// Returns a copy of the current batch.
    pub async fn snapshot(&self) -> BatchSnapshot {
        let state = self.state.lock().await;
        BatchSnapshot {
            generation: state.generation,
            parameters: state.parameters.clone(),
            source_records: state.records.len(),
            entries: state.entries.clone(),
        }
    }

    fn start_run(&self, state: &mut BatchState) -> BatchRun {
        state.generation += 1;
        let generation: u64 = state.generation;
        state.entries.clear();

        let mut requests: Vec<(usize, EvaluationRequest)> = Vec::new();
        for record in &state.records {
            let Some(id) = record.id() else {
                continue;
            };
            let Some(payload) = build_payload(record, &state.parameters) else {
                continue;
            };
            let entry: PlayerEvaluationEntry = PlayerEvaluationEntry::loading(id, record, &payload);
            requests.push((
                state.entries.len(),
                EvaluationRequest::new(payload, &self.caller),
            ));
            state.entries.push(entry);
        }

        info!(
            generation,
            records = state.records.len(),
            dispatched = requests.len(),
            "Starting evaluation batch"
        );
        self.events.broadcast(&BatchEvent::BatchStarted {
            generation,
            entries: requests.len(),
        });

        let handles: Vec<JoinHandle<bool>> = requests
            .into_iter()
            .map(|(index, request)| {
                let evaluator: Arc<E> = Arc::clone(&self.evaluator);
                let state: Arc<Mutex<BatchState>> = Arc::clone(&self.state);
                let events: BatchEventBroadcaster = self.events.clone();
                tokio::spawn(async move {
                    let call: JoinHandle<Result<AnalysisResult, EvaluationError>> =
                        tokio::spawn(async move { evaluator.evaluate(request).await });
                    let outcome: Result<AnalysisResult, EvaluationError> =
                        call.await.unwrap_or_else(|e| {
                            Err(EvaluationError::Transport(format!(
                                "Evaluation task failed: {e}"
                            )))
                        });
                    apply_outcome(&state, &events, generation, index, outcome).await
                })
            })
            .collect();

        BatchRun {
            generation,
            handles,
        }
    }
}

/// Settles one entry with an evaluation outcome.
///
/// Returns `false` without touching anything when the generation has been
/// superseded or the entry already settled.
async fn apply_outcome(
    state: &Mutex<BatchState>,
    events: &BatchEventBroadcaster,
    generation: u64,
    index: usize,
    outcome: Result<AnalysisResult, EvaluationError>,
) -> bool {
    let mut state = state.lock().await;
    if state.generation != generation {
        debug!(
            generation,
            current = state.generation,
            "Dropping response for superseded batch"
        );
        return false;
    }
    let Some(entry) = state.entries.get_mut(index) else {
        return false;
    };
    if entry.status.is_terminal() {
        return false;
    }

    match outcome {
        Ok(analysis) => {
            entry.status = classify_analysis(&analysis);
            entry.analysis = Some(analysis);
        }
        Err(e) => {
            error!(player_id = %entry.id, error = %e, "Evaluation request failed");
            entry.status = EvaluationStatus::Error;
            entry.error = Some(String::from(CONNECTION_ERROR_MESSAGE));
        }
    }

    events.broadcast(&BatchEvent::EntryUpdated {
        generation,
        player_id: entry.id.clone(),
        status: entry.status,
    });
    true
}
