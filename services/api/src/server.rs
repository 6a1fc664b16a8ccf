use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_parlay_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use parlay_ai::config::AppConfig;
use parlay_ai::error::AppError;
use parlay_ai::store::RestStore;
use parlay_ai::telemetry;
use parlay_ai::workflows::parlays::{RecommendationService, RecommendationSettings};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    if !config.store.is_configured() {
        warn!("SUPABASE_URL / SUPABASE_SERVICE_ROLE_KEY missing; predictions will fail until set");
    }

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(RestStore::from_config(&config.store));
    let settings = RecommendationSettings::from_config(&config.parlays);
    let service = Arc::new(RecommendationService::new(store, settings));

    let app = with_parlay_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "parlay prediction service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
