use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_skill_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use mindcheck::config::AppConfig;
use mindcheck::error::AppError;
use mindcheck::surveys::{spawn_session_sweeper, SessionStore, SurveyCatalog, SurveyService};
use mindcheck::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let catalog = Arc::new(SurveyCatalog::standard()?);
    let sessions = Arc::new(SessionStore::default());
    let _sweeper = spawn_session_sweeper(sessions.clone(), config.sessions);
    let survey_service = Arc::new(SurveyService::new(catalog, sessions));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let app = with_skill_routes(survey_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "survey skill service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
