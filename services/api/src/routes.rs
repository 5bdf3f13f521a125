use std::sync::Arc;

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use changesim::session::{session_router, GameService, SessionStore};
use serde_json::json;

use crate::infra::AppState;

/// Compose the session API with the operational endpoints.
pub(crate) fn with_session_routes<S>(service: Arc<GameService<S>>) -> axum::Router
where
    S: SessionStore + 'static,
{
    session_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemorySessionStore;
    use axum::body::Body;
    use axum::http::Request;
    use changesim::simulation::ScenarioCatalog;
    use tower::ServiceExt;

    fn test_router() -> axum::Router {
        let store = Arc::new(InMemorySessionStore::default());
        let service = Arc::new(GameService::new(store, ScenarioCatalog::standard(), Some(5)));
        session_router(service).route("/health", axum::routing::get(healthcheck))
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn create_and_snapshot_round_trip() {
        let router = test_router();

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/games")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::CREATED);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        let created: serde_json::Value = serde_json::from_slice(&bytes).expect("valid json");
        let code = created["code"].as_str().expect("code present");

        let response = router
            .oneshot(
                Request::builder()
                    .uri(format!("/api/v1/games/{code}"))
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        let view: serde_json::Value = serde_json::from_slice(&bytes).expect("valid json");
        assert_eq!(view["current_round"], 1);
        assert_eq!(view["started"], false);
    }

    #[tokio::test]
    async fn unknown_game_returns_not_found() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/games/ZZZZZZ")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
