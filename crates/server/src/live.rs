// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Live batch progress streaming over WebSocket.
//!
//! Events are informational only. Clients must still fetch `/results` for
//! the authoritative entries; nothing sent by a client is acted upon.

use axum::{
    extract::{
        WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use futures::{SinkExt, stream::StreamExt};
use nt_scout::BatchEvent;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, error, info, warn};

/// Sent once when a client connects, before any batch event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConnectionEvent {
    Connected {
        /// Server timestamp (ISO 8601).
        timestamp: String,
    },
}

impl ConnectionEvent {
    /// A connection confirmation stamped with the current time.
    #[must_use]
    pub fn connected_now() -> Self {
        Self::Connected {
            timestamp: time::OffsetDateTime::now_utc()
                .format(&time::format_description::well_known::Iso8601::DEFAULT)
                .unwrap_or_else(|_| String::from("unknown")),
        }
    }
}

/// Upgrades the connection and streams batch events from `rx`.
pub fn stream_batch_events(ws: WebSocketUpgrade, rx: broadcast::Receiver<BatchEvent>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, rx))
}

/// Handles an individual WebSocket connection.
///
/// Sends a connection confirmation, then streams batch events until the
/// client disconnects or the event source closes.
async fn handle_socket(socket: WebSocket, mut rx: broadcast::Receiver<BatchEvent>) {
    info!("Client connected to live event stream");

    let (mut sender, mut receiver) = socket.split();

    if let Ok(json) = serde_json::to_string(&ConnectionEvent::connected_now())
        && sender.send(Message::Text(json.into())).await.is_err()
    {
        warn!("Failed to send connection confirmation");
        return;
    }

    let mut send_task = tokio::spawn(async move {
        loop {
            let event: BatchEvent = match rx.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Live client fell behind, events dropped");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };
            match serde_json::to_string(&event) {
                Ok(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    error!(?e, "Failed to serialize batch event");
                }
            }
        }
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(_) | Message::Binary(_)) => {
                    warn!("Received unexpected message from client, ignoring");
                }
                Ok(Message::Close(_)) => {
                    debug!("Client sent close frame");
                    break;
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {}
                Err(e) => {
                    error!(?e, "WebSocket receive error");
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => {
            debug!("Send task completed");
            recv_task.abort();
        }
        _ = &mut recv_task => {
            debug!("Receive task completed");
            send_task.abort();
        }
    }

    info!("Client disconnected from live event stream");
}
