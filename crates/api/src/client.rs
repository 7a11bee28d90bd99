// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Client for the remote service.
//!
//! Every operation is a JSON `POST` to one endpoint; the body's `action` and
//! `method` fields select what the service does. Evaluation requests are
//! the bare canonical payload plus the caller's e-mail.

use nt_scout::{EvaluationError, EvaluationRequest, Evaluator};
use nt_scout_domain::{AnalysisResult, RawPlayerRecord, UserTarget};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::ClientError;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for [`RemoteClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// URL every request is posted to.
    pub endpoint: String,
    /// E-mail identifying the user on whose behalf requests are made.
    pub caller: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Creates a configuration with the default timeout.
    #[must_use]
    pub fn new(endpoint: &str, caller: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            caller: caller.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Body of a player data request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlayersRequest<'a> {
    action: &'static str,
    method: &'static str,
    requester_email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    list_id: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct PlayersResponse {
    #[serde(default)]
    players: Vec<RawPlayerRecord>,
}

/// Body of a user target request.
#[derive(Debug, Serialize)]
struct TargetsRequest<'a> {
    action: &'static str,
    method: &'static str,
    email: &'a str,
}

#[derive(Debug, Deserialize)]
struct TargetsResponse {
    #[serde(default)]
    targets: Vec<UserTarget>,
}

/// Shared client for the remote service.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl RemoteClient {
    /// Creates a client.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Build` if the HTTP client cannot be constructed.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http: reqwest::Client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;
        info!(endpoint = %config.endpoint, timeout = ?config.timeout, "Remote client ready");
        Ok(Self { http, config })
    }

    /// The caller identity sent with every request.
    #[must_use]
    pub fn caller(&self) -> &str {
        &self.config.caller
    }

    /// Posts `body` and decodes the JSON response.
    async fn post<B, T>(&self, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let response: reqwest::Response = self
            .http
            .post(&self.config.endpoint)
            .json(body)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status: reqwest::StatusCode = response.status();
        if !status.is_success() {
            let body: String = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// Requests the analysis of one player.
    ///
    /// # Errors
    ///
    /// Returns a `ClientError` if the request fails, the service answers with
    /// a non-success status, or the body is not an analysis result.
    pub async fn analyze(&self, request: &EvaluationRequest) -> Result<AnalysisResult, ClientError> {
        self.post(request).await
    }

    /// Fetches every player on a watch list.
    ///
    /// # Errors
    ///
    /// Returns a `ClientError` if the remote call fails.
    pub async fn list_players_detailed(
        &self,
        list_id: &str,
    ) -> Result<Vec<RawPlayerRecord>, ClientError> {
        let response: PlayersResponse = self
            .post(&PlayersRequest {
                action: "manage_players",
                method: "get_list_players_detailed",
                requester_email: &self.config.caller,
                list_id: Some(list_id),
            })
            .await?;
        debug!(list_id, players = response.players.len(), "Fetched list players");
        Ok(response.players)
    }

    /// Fetches the players owned by the caller.
    ///
    /// # Errors
    ///
    /// Returns a `ClientError` if the remote call fails.
    pub async fn my_players(&self) -> Result<Vec<RawPlayerRecord>, ClientError> {
        let response: PlayersResponse = self
            .post(&PlayersRequest {
                action: "manage_players",
                method: "get_my_players",
                requester_email: &self.config.caller,
                list_id: None,
            })
            .await?;
        debug!(players = response.players.len(), "Fetched own players");
        Ok(response.players)
    }

    /// Fetches the caller's user-defined targets.
    ///
    /// # Errors
    ///
    /// Returns a `ClientError` if the remote call fails.
    pub async fn user_targets(&self) -> Result<Vec<UserTarget>, ClientError> {
        let response: TargetsResponse = self
            .post(&TargetsRequest {
                action: "manage_targets",
                method: "get",
                email: &self.config.caller,
            })
            .await?;
        Ok(response.targets)
    }
}

impl Evaluator for RemoteClient {
    async fn evaluate(&self, request: EvaluationRequest) -> Result<AnalysisResult, EvaluationError> {
        self.analyze(&request).await.map_err(EvaluationError::from)
    }
}
