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
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod live;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, Query, State as AxumState, WebSocketUpgrade},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use nt_scout::{BatchOrchestrator, BatchRun, BatchSnapshot};
use nt_scout_api::{
    ApiError, ClientConfig, CsvImportResult, CsvRowIssue, RemoteClient, import_player_csv,
};
use nt_scout_domain::{EvaluationOptions, EvaluationParameters, RawPlayerRecord};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// NT Scout Server - batch player evaluation over HTTP
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to bind the server to
    #[arg(short, long, env = "NT_SCOUT_PORT", default_value_t = 3000)]
    port: u16,

    /// URL of the remote evaluation and data service
    #[arg(long, env = "NT_SCOUT_ENDPOINT")]
    endpoint: String,

    /// E-mail identifying the user on whose behalf requests are made
    #[arg(long, env = "NT_SCOUT_CALLER")]
    caller: String,

    /// Per-request timeout for remote calls, in seconds
    #[arg(long, env = "NT_SCOUT_TIMEOUT_SECS", default_value_t = 10)]
    timeout_secs: u64,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// Owner of the current evaluation batch.
    orchestrator: Arc<BatchOrchestrator<RemoteClient>>,
    /// Client for player lists and user targets.
    client: Arc<RemoteClient>,
}

impl AppState {
    fn new(client: RemoteClient) -> Self {
        let orchestrator: BatchOrchestrator<RemoteClient> =
            BatchOrchestrator::new(client.clone(), client.caller());
        Self {
            orchestrator: Arc::new(orchestrator),
            client: Arc::new(client),
        }
    }
}

/// Query options for requests that start a batch run.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
struct RunQuery {
    /// Wait for every evaluation to settle before responding.
    #[serde(default)]
    wait: bool,
}

/// A partial parameter update. Absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
struct ParametersUpdate {
    role: Option<String>,
    target: Option<String>,
    variant: Option<String>,
}

impl ParametersUpdate {
    /// Overwrites the fields present in the update.
    fn apply_to(self, parameters: &mut EvaluationParameters) {
        if let Some(role) = self.role {
            parameters.role = role;
        }
        if let Some(target) = self.target {
            parameters.target = target;
        }
        if let Some(variant) = self.variant {
            parameters.variant = variant;
        }
    }
}

/// Response for a parameter update.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ParametersResponse {
    /// The parameters now in effect.
    parameters: EvaluationParameters,
    /// Whether the loaded batch was re-evaluated.
    rerun: bool,
    /// Current batch generation.
    generation: u64,
}

/// A row skipped during file ingestion.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct SkippedRowResponse {
    row_number: usize,
    reason: String,
}

impl From<CsvRowIssue> for SkippedRowResponse {
    fn from(issue: CsvRowIssue) -> Self {
        Self {
            row_number: issue.row_number,
            reason: issue.reason,
        }
    }
}

/// Response for a request that loaded a new batch.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct BatchResponse {
    #[serde(flatten)]
    batch: BatchSnapshot,
    /// Rows skipped during ingestion; always empty for remote sources.
    skipped_rows: Vec<SkippedRowResponse>,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::InvalidCsvFormat { .. } => Self {
                status: StatusCode::BAD_REQUEST,
                message: err.to_string(),
            },
            ApiError::RemoteFetch { .. } => {
                error!(error = %err, "Remote fetch failed");
                Self {
                    status: StatusCode::BAD_GATEWAY,
                    message: err.to_string(),
                }
            }
        }
    }
}

impl From<tokio::task::JoinError> for HttpError {
    fn from(err: tokio::task::JoinError) -> Self {
        error!(error = %err, "Background task failed");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("Background task failed: {err}"),
        }
    }
}

/// Loads `records` as the new batch and builds the response.
async fn load_and_respond(
    app_state: &AppState,
    records: Vec<RawPlayerRecord>,
    skipped_rows: Vec<CsvRowIssue>,
    query: RunQuery,
) -> BatchResponse {
    let run: BatchRun = app_state.orchestrator.load_batch(records).await;
    if query.wait {
        run.settled().await;
    }
    BatchResponse {
        batch: app_state.orchestrator.snapshot().await,
        skipped_rows: skipped_rows
            .into_iter()
            .map(SkippedRowResponse::from)
            .collect(),
    }
}

/// Handler for POST `/batches/csv` endpoint.
///
/// Ingests a delimited player export and evaluates it as a new batch.
async fn handle_load_csv(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<RunQuery>,
    body: Bytes,
) -> Result<Json<BatchResponse>, HttpError> {
    info!(bytes = body.len(), "Handling CSV batch upload");

    let import: CsvImportResult =
        tokio::task::spawn_blocking(move || import_player_csv(&body)).await??;

    Ok(Json(
        load_and_respond(&app_state, import.records, import.skipped_rows, query).await,
    ))
}

/// Handler for POST `/batches/lists/{list_id}` endpoint.
async fn handle_load_list(
    AxumState(app_state): AxumState<AppState>,
    Path(list_id): Path<String>,
    Query(query): Query<RunQuery>,
) -> Result<Json<BatchResponse>, HttpError> {
    info!(list_id = %list_id, "Handling list batch request");

    let records: Vec<RawPlayerRecord> = app_state
        .client
        .list_players_detailed(&list_id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(
        load_and_respond(&app_state, records, Vec::new(), query).await,
    ))
}

/// Handler for POST `/batches/my-players` endpoint.
async fn handle_load_my_players(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<RunQuery>,
) -> Result<Json<BatchResponse>, HttpError> {
    info!("Handling own players batch request");

    let records: Vec<RawPlayerRecord> = app_state
        .client
        .my_players()
        .await
        .map_err(ApiError::from)?;

    Ok(Json(
        load_and_respond(&app_state, records, Vec::new(), query).await,
    ))
}

/// Handler for POST `/batches/rerun` endpoint.
///
/// Re-evaluates the loaded records with the current parameters.
async fn handle_rerun(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<RunQuery>,
) -> Json<BatchSnapshot> {
    info!("Handling batch re-run request");

    let run: BatchRun = app_state.orchestrator.rerun().await;
    if query.wait {
        run.settled().await;
    }
    Json(app_state.orchestrator.snapshot().await)
}

/// Handler for GET `/parameters` endpoint.
async fn handle_get_parameters(
    AxumState(app_state): AxumState<AppState>,
) -> Json<EvaluationParameters> {
    Json(app_state.orchestrator.parameters().await)
}

/// Handler for PUT `/parameters` endpoint.
///
/// A changed parameter re-evaluates the loaded batch.
async fn handle_update_parameters(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<RunQuery>,
    Json(update): Json<ParametersUpdate>,
) -> Json<ParametersResponse> {
    let (parameters, run): (EvaluationParameters, Option<BatchRun>) = app_state
        .orchestrator
        .update_parameters(|current| update.apply_to(current))
        .await;

    let rerun: bool = run.is_some();
    let generation: u64 = match run {
        Some(run) => {
            let generation: u64 = run.generation();
            if query.wait {
                run.settled().await;
            }
            generation
        }
        None => app_state.orchestrator.snapshot().await.generation,
    };

    Json(ParametersResponse {
        parameters,
        rerun,
        generation,
    })
}

/// Handler for GET `/options` endpoint.
///
/// Falls back to the default options when the user targets cannot be
/// fetched.
async fn handle_get_options(AxumState(app_state): AxumState<AppState>) -> Json<EvaluationOptions> {
    let options: EvaluationOptions = match app_state.client.user_targets().await {
        Ok(targets) => EvaluationOptions::default().merge_user_targets(&targets),
        Err(e) => {
            error!(error = %e, "Failed to fetch user targets");
            EvaluationOptions::default()
        }
    };
    Json(options)
}

/// Handler for GET `/results` endpoint.
async fn handle_get_results(AxumState(app_state): AxumState<AppState>) -> Json<BatchSnapshot> {
    Json(app_state.orchestrator.snapshot().await)
}

/// Handler for GET `/live` endpoint.
#[allow(clippy::unused_async)]
async fn handle_live(
    ws: WebSocketUpgrade,
    AxumState(app_state): AxumState<AppState>,
) -> Response {
    live::stream_batch_events(ws, app_state.orchestrator.subscribe())
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/batches/csv", post(handle_load_csv))
        .route("/batches/lists/{list_id}", post(handle_load_list))
        .route("/batches/my-players", post(handle_load_my_players))
        .route("/batches/rerun", post(handle_rerun))
        .route(
            "/parameters",
            get(handle_get_parameters).put(handle_update_parameters),
        )
        .route("/options", get(handle_get_options))
        .route("/results", get(handle_get_results))
        .route("/live", get(handle_live))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing NT Scout Server");

    let client: RemoteClient = RemoteClient::new(ClientConfig {
        endpoint: args.endpoint,
        caller: args.caller,
        timeout: Duration::from_secs(args.timeout_secs),
    })?;

    let app: Router = build_router(AppState::new(client));

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use nt_scout::CONNECTION_ERROR_MESSAGE;
    use nt_scout_domain::EvaluationStatus;
    use tower::ServiceExt;

    const TEST_CSV: &str = "\
PlayerID;FirstName;LastName;Age;AgeDays;Updated;TrainingName;StaminaTrainingPart;PlaymakerSkill
1001;Mario;Rossi;19;56;22/12/2025 06:52:51;Regia;12;14
;Senza;Id;18;0;;;;
1002;Luigi;Verdi;20;10;2025-12-20 10:00:00;Difesa;15;5
";

    /// Helper to create test app state pointing at a port nothing listens on.
    fn create_test_app_state() -> AppState {
        let client: RemoteClient = RemoteClient::new(ClientConfig {
            endpoint: String::from("http://127.0.0.1:1/"),
            caller: String::from("coach@example.com"),
            timeout: Duration::from_secs(2),
        })
        .expect("Failed to create client");
        AppState::new(client)
    }

    fn post_csv(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "text/csv")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn put_parameters(uri: &str, update: &ParametersUpdate) -> Request<Body> {
        Request::builder()
            .method("PUT")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(update).unwrap()))
            .unwrap()
    }

    async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body_bytes).unwrap()
    }

    #[tokio::test]
    async fn test_results_empty_before_any_batch() {
        let app: Router = build_router(create_test_app_state());

        let response = app.oneshot(get_request("/results")).await.unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        let snapshot: BatchSnapshot = read_json(response).await;
        assert_eq!(snapshot.generation, 0);
        assert!(snapshot.entries.is_empty());
        assert_eq!(snapshot.parameters, EvaluationParameters::default());
    }

    #[tokio::test]
    async fn test_csv_upload_creates_loading_entries() {
        let app: Router = build_router(create_test_app_state());

        let response = app
            .oneshot(post_csv("/batches/csv", TEST_CSV))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        let batch: BatchResponse = read_json(response).await;
        assert_eq!(batch.batch.generation, 1);
        assert_eq!(batch.batch.source_records, 3);
        assert_eq!(batch.batch.entries.len(), 2);
        assert_eq!(batch.batch.entries[0].id, "1001");
        assert_eq!(batch.batch.entries[1].id, "1002");
        assert!(batch.skipped_rows.is_empty());
    }

    #[tokio::test]
    async fn test_csv_upload_with_unreachable_evaluator_settles_as_error() {
        let app: Router = build_router(create_test_app_state());

        let response = app
            .oneshot(post_csv("/batches/csv?wait=true", TEST_CSV))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        let batch: BatchResponse = read_json(response).await;
        assert_eq!(batch.batch.entries.len(), 2);
        for entry in &batch.batch.entries {
            assert_eq!(entry.status, EvaluationStatus::Error);
            assert_eq!(entry.error.as_deref(), Some(CONNECTION_ERROR_MESSAGE));
            assert!(entry.analysis.is_none());
        }
    }

    #[tokio::test]
    async fn test_empty_csv_is_bad_request() {
        let app: Router = build_router(create_test_app_state());

        let response = app.oneshot(post_csv("/batches/csv", "")).await.unwrap();

        assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);
        let error: ErrorResponse = read_json(response).await;
        assert!(error.error);
        assert!(error.message.contains("Invalid CSV format"));
    }

    #[tokio::test]
    async fn test_remote_fetch_failure_is_bad_gateway() {
        let app: Router = build_router(create_test_app_state());

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/batches/my-players")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::BAD_GATEWAY);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/batches/lists/list-7")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_parameter_update_without_batch_does_not_run() {
        let app: Router = build_router(create_test_app_state());

        let response = app
            .clone()
            .oneshot(put_parameters(
                "/parameters",
                &ParametersUpdate {
                    role: Some(String::from("defender")),
                    ..ParametersUpdate::default()
                },
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        let updated: ParametersResponse = read_json(response).await;
        assert!(!updated.rerun);
        assert_eq!(updated.generation, 0);

        let response = app.oneshot(get_request("/parameters")).await.unwrap();
        let parameters: EvaluationParameters = read_json(response).await;
        assert_eq!(
            parameters,
            EvaluationParameters::new("defender", "U21", "Normal")
        );
    }

    #[tokio::test]
    async fn test_parameter_update_reruns_loaded_batch() {
        let app: Router = build_router(create_test_app_state());

        app.clone()
            .oneshot(post_csv("/batches/csv?wait=true", TEST_CSV))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(put_parameters(
                "/parameters?wait=true",
                &ParametersUpdate {
                    target: Some(String::from("NT")),
                    ..ParametersUpdate::default()
                },
            ))
            .await
            .unwrap();
        let updated: ParametersResponse = read_json(response).await;
        assert!(updated.rerun);
        assert_eq!(updated.generation, 2);
        assert_eq!(updated.parameters.target, "NT");

        let response = app.oneshot(get_request("/results")).await.unwrap();
        let snapshot: BatchSnapshot = read_json(response).await;
        assert_eq!(snapshot.generation, 2);
        assert_eq!(snapshot.entries.len(), 2);
        assert_eq!(snapshot.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_rerun_bumps_generation() {
        let app: Router = build_router(create_test_app_state());

        app.clone()
            .oneshot(post_csv("/batches/csv?wait=true", TEST_CSV))
            .await
            .unwrap();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/batches/rerun?wait=true")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        let snapshot: BatchSnapshot = read_json(response).await;
        assert_eq!(snapshot.generation, 2);
        assert_eq!(snapshot.count_with_status(EvaluationStatus::Error), 2);
    }

    #[tokio::test]
    async fn test_options_fall_back_to_defaults() {
        let app: Router = build_router(create_test_app_state());

        let response = app.oneshot(get_request("/options")).await.unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        let options: EvaluationOptions = read_json(response).await;
        assert_eq!(options, EvaluationOptions::default());
    }

    #[tokio::test]
    async fn test_concurrent_partial_updates_keep_both_fields() {
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state.clone());

        app.clone()
            .oneshot(post_csv("/batches/csv?wait=true", TEST_CSV))
            .await
            .unwrap();

        let (role_response, target_response) = tokio::join!(
            app.clone().oneshot(put_parameters(
                "/parameters",
                &ParametersUpdate {
                    role: Some(String::from("defender")),
                    ..ParametersUpdate::default()
                },
            )),
            app.clone().oneshot(put_parameters(
                "/parameters",
                &ParametersUpdate {
                    target: Some(String::from("NT")),
                    ..ParametersUpdate::default()
                },
            )),
        );
        let role_update: ParametersResponse = read_json(role_response.unwrap()).await;
        let target_update: ParametersResponse = read_json(target_response.unwrap()).await;

        assert!(role_update.rerun && target_update.rerun);
        assert_ne!(role_update.generation, target_update.generation);
        assert_eq!(
            app_state.orchestrator.parameters().await,
            EvaluationParameters::new("defender", "NT", "Normal")
        );
    }

    #[test]
    fn test_parameters_update_overwrites_present_fields_only() {
        let mut parameters: EvaluationParameters = EvaluationParameters::default();

        ParametersUpdate {
            variant: Some(String::from("PNF")),
            ..ParametersUpdate::default()
        }
        .apply_to(&mut parameters);

        assert_eq!(
            parameters,
            EvaluationParameters::new("midfielder", "U21", "PNF")
        );
    }

    type LiveSocket = tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >;

    /// Reads the next text frame from the live stream as JSON.
    async fn next_live_event(socket: &mut LiveSocket) -> serde_json::Value {
        use futures::StreamExt;

        loop {
            let message = tokio::time::timeout(Duration::from_secs(5), socket.next())
                .await
                .expect("Timed out waiting for live event")
                .expect("Live stream ended")
                .expect("Live stream error");
            if message.is_text() {
                return serde_json::from_str(message.to_text().unwrap()).unwrap();
            }
        }
    }

    #[tokio::test]
    async fn test_live_stream_forwards_batch_events() {
        use futures::SinkExt;
        use tokio_tungstenite::tungstenite::Message as ClientMessage;

        let app_state: AppState = create_test_app_state();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr: std::net::SocketAddr = listener.local_addr().unwrap();
        let server_app: Router = build_router(app_state.clone());
        tokio::spawn(async move {
            axum::serve(listener, server_app).await.unwrap();
        });

        let (mut socket, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/live"))
            .await
            .expect("Failed to connect to live stream");

        let connected: serde_json::Value = next_live_event(&mut socket).await;
        assert_eq!(connected["type"], "connected");
        assert!(connected["timestamp"].is_string());

        socket
            .send(ClientMessage::text(String::from("ignored")))
            .await
            .unwrap();

        let response = build_router(app_state)
            .oneshot(post_csv("/batches/csv?wait=true", TEST_CSV))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);

        let started: serde_json::Value = next_live_event(&mut socket).await;
        assert_eq!(started["type"], "batch_started");
        assert_eq!(started["generation"], 1);
        assert_eq!(started["entries"], 2);

        let mut updated: Vec<String> = Vec::new();
        for _ in 0..2 {
            let event: serde_json::Value = next_live_event(&mut socket).await;
            assert_eq!(event["type"], "entry_updated");
            assert_eq!(event["generation"], 1);
            assert_eq!(event["status"], "ERROR");
            updated.push(event["player_id"].as_str().unwrap().to_string());
        }
        updated.sort();
        assert_eq!(updated, vec!["1001", "1002"]);
    }
}
