// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{ApiError, ClientConfig, ClientError, RemoteClient};
use nt_scout::{EvaluationError, EvaluationRequest, Evaluator};
use nt_scout_domain::{CanonicalPayload, SkillSet, TrainingType};
use std::time::Duration;

/// A client pointed at a port nothing listens on.
fn unreachable_client() -> RemoteClient {
    RemoteClient::new(ClientConfig {
        endpoint: String::from("http://127.0.0.1:1/"),
        caller: String::from("coach@example.com"),
        timeout: Duration::from_secs(2),
    })
    .unwrap()
}

fn create_request() -> EvaluationRequest {
    EvaluationRequest::new(
        CanonicalPayload {
            last_update: String::from("2025-12-22T06:52:51"),
            player_age: 19.5,
            player_role: String::from("midfielder"),
            team_target: String::from("U21"),
            role_variant: String::from("Normal"),
            training_type: TrainingType::Playmaking,
            stamina_share: 12,
            current_skills: SkillSet::default(),
        },
        "coach@example.com",
    )
}

#[test]
fn test_client_config_defaults() {
    let config: ClientConfig = ClientConfig::new("http://localhost:8080", "coach@example.com");
    assert_eq!(config.timeout, Duration::from_secs(10));

    let client: RemoteClient = RemoteClient::new(config).unwrap();
    assert_eq!(client.caller(), "coach@example.com");
}

#[tokio::test]
async fn test_unreachable_evaluator_is_transport_error() {
    let client: RemoteClient = unreachable_client();

    let result: Result<_, EvaluationError> = client.evaluate(create_request()).await;

    assert!(matches!(result, Err(EvaluationError::Transport(_))));
}

#[tokio::test]
async fn test_unreachable_data_store_is_remote_fetch_error() {
    let client: RemoteClient = unreachable_client();

    let players: Result<_, ClientError> = client.my_players().await;
    assert!(matches!(players, Err(ClientError::Transport(_))));

    let api_error: ApiError = ApiError::from(players.unwrap_err());
    assert!(matches!(api_error, ApiError::RemoteFetch { .. }));
}

#[test]
fn test_client_error_mapping() {
    assert_eq!(
        EvaluationError::from(ClientError::Status {
            status: 500,
            body: String::from("boom"),
        }),
        EvaluationError::Rejected {
            status: 500,
            message: String::from("boom"),
        }
    );
    assert_eq!(
        EvaluationError::from(ClientError::Decode(String::from("bad json"))),
        EvaluationError::InvalidResponse(String::from("bad json"))
    );
}
