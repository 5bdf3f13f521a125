use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use changesim::config::AppConfig;
use changesim::error::AppError;
use changesim::session::GameService;
use changesim::simulation::ScenarioCatalog;
use changesim::telemetry;
use tracing::info;

use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemorySessionStore};
use crate::routes::with_session_routes;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(seed) = args.seed.take() {
        config.engine.seed = Some(seed);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemorySessionStore::default());
    let game_service = Arc::new(GameService::new(
        store,
        ScenarioCatalog::standard(),
        config.engine.seed,
    ));

    let app = with_session_routes(game_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "change leadership simulation ready");

    axum::serve(listener, app).await?;
    Ok(())
}
