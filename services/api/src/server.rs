use crate::cli::ServeArgs;
use crate::infra::{cors_layer, AppState, SharedService};
use crate::routes::router;
use axum::extract::DefaultBodyLimit;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use payout_engine::config::AppConfig;
use payout_engine::error::AppError;
use payout_engine::telemetry;
use payout_engine::workflows::extraction::{OpenAiVisionClient, VisionExtractor};
use payout_engine::workflows::payout::PayoutEngine;
use payout_engine::workflows::pipeline::RateCardService;
use std::sync::atomic::{AtomicBool, Ordering};
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
    config.extraction.require_api_key()?;

    let extractor: Arc<dyn VisionExtractor> =
        Arc::new(OpenAiVisionClient::from_config(&config.extraction)?);
    let engine = Arc::new(PayoutEngine::default());
    let service: SharedService = Arc::new(RateCardService::new(extractor, engine));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        index_html: Arc::new(config.server.index_html.clone()),
    };

    let app = router(service)
        .layer(Extension(app_state))
        .layer(DefaultBodyLimit::max(config.server.upload_limit_bytes))
        .layer(cors_layer(&config.server.cors_origins))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        model = %config.extraction.model,
        upload_limit = config.server.upload_limit_bytes,
        "rate card payout service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
