use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::simulation::SubmittedDecisions;

use super::domain::{FacilitatorKey, GameCode};
use super::repository::SessionStore;
use super::service::{GameService, SessionError};

/// Router builder exposing the session lifecycle over HTTP.
pub fn session_router<S>(service: Arc<GameService<S>>) -> Router
where
    S: SessionStore + 'static,
{
    Router::new()
        .route("/api/v1/games", post(create_handler::<S>))
        .route("/api/v1/games/:code", get(snapshot_handler::<S>))
        .route("/api/v1/games/:code/players", post(join_handler::<S>))
        .route("/api/v1/games/:code/start", post(start_handler::<S>))
        .route("/api/v1/games/:code/decisions", post(submit_handler::<S>))
        .route("/api/v1/games/:code/resolve", post(resolve_handler::<S>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub struct JoinRequest {
    pub player_name: String,
}

#[derive(Debug, Deserialize)]
pub struct FacilitatorRequest {
    pub facilitator_key: String,
}

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub decisions: SubmittedDecisions,
}

pub(crate) async fn create_handler<S>(State(service): State<Arc<GameService<S>>>) -> Response
where
    S: SessionStore + 'static,
{
    match service.create_game() {
        Ok(created) => (StatusCode::CREATED, axum::Json(created)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn snapshot_handler<S>(
    State(service): State<Arc<GameService<S>>>,
    Path(code): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
{
    match service.snapshot(&GameCode(code)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn join_handler<S>(
    State(service): State<Arc<GameService<S>>>,
    Path(code): Path<String>,
    axum::Json(request): axum::Json<JoinRequest>,
) -> Response
where
    S: SessionStore + 'static,
{
    match service.join_game(&GameCode(code), &request.player_name) {
        Ok(player) => (StatusCode::CREATED, axum::Json(player)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn start_handler<S>(
    State(service): State<Arc<GameService<S>>>,
    Path(code): Path<String>,
    axum::Json(request): axum::Json<FacilitatorRequest>,
) -> Response
where
    S: SessionStore + 'static,
{
    let key = FacilitatorKey(request.facilitator_key);
    match service.start_game(&GameCode(code), &key) {
        Ok(()) => (
            StatusCode::OK,
            axum::Json(json!({ "status": "started" })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_handler<S>(
    State(service): State<Arc<GameService<S>>>,
    Path(code): Path<String>,
    axum::Json(request): axum::Json<SubmitRequest>,
) -> Response
where
    S: SessionStore + 'static,
{
    match service.submit_decisions(&GameCode(code), request.decisions) {
        Ok(()) => (
            StatusCode::OK,
            axum::Json(json!({ "status": "submitted" })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn resolve_handler<S>(
    State(service): State<Arc<GameService<S>>>,
    Path(code): Path<String>,
    axum::Json(request): axum::Json<FacilitatorRequest>,
) -> Response
where
    S: SessionStore + 'static,
{
    let key = FacilitatorKey(request.facilitator_key);
    match service.resolve_round(&GameCode(code), &key) {
        Ok(resolved) => (StatusCode::OK, axum::Json(resolved)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: SessionError) -> Response {
    let status = match &error {
        SessionError::GameNotFound(_) => StatusCode::NOT_FOUND,
        SessionError::NotFacilitator => StatusCode::FORBIDDEN,
        SessionError::AlreadyStarted
        | SessionError::NotStarted
        | SessionError::GameEnded
        | SessionError::NoPlayers
        | SessionError::DecisionsPending => StatusCode::CONFLICT,
        SessionError::InvalidSubmission(_) | SessionError::EmptyPlayerName => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        SessionError::ScenarioNotFound(_)
        | SessionError::Engine(_)
        | SessionError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
