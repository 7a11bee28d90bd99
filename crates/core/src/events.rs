// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Batch progress notifications.
//!
//! Events describe what changed in the orchestrator's batch. They are
//! informational; the authoritative state is always the orchestrator's
//! snapshot.

use nt_scout_domain::EvaluationStatus;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

/// Maximum number of events to buffer in the broadcast channel.
/// Slow subscribers lose the oldest events.
const EVENT_BUFFER_SIZE: usize = 256;

/// A change in the evaluation batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BatchEvent {
    /// A new batch generation replaced the previous entries.
    BatchStarted {
        generation: u64,
        /// Number of entries dispatched for evaluation.
        entries: usize,
    },
    /// One entry reached a terminal status.
    EntryUpdated {
        generation: u64,
        player_id: String,
        status: EvaluationStatus,
    },
}

/// Fan-out of batch events to any number of subscribers.
#[derive(Debug, Clone)]
pub struct BatchEventBroadcaster {
    tx: broadcast::Sender<BatchEvent>,
}

impl BatchEventBroadcaster {
    /// Creates a broadcaster with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(EVENT_BUFFER_SIZE);
        Self { tx }
    }

    /// Publishes an event. Without subscribers the event is dropped.
    pub fn broadcast(&self, event: &BatchEvent) {
        match self.tx.send(event.clone()) {
            Ok(count) => debug!(?event, receivers = count, "Broadcast batch event"),
            Err(_) => debug!(?event, "No receivers for batch event"),
        }
    }

    /// Subscribes to events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<BatchEvent> {
        self.tx.subscribe()
    }
}

impl Default for BatchEventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}
