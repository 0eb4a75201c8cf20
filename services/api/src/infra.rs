use axum::http::{HeaderValue, Method};
use metrics_exporter_prometheus::PrometheusHandle;
use payout_engine::workflows::extraction::VisionExtractor;
use payout_engine::workflows::pipeline::RateCardService;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::warn;

pub(crate) type SharedService = Arc<RateCardService<dyn VisionExtractor>>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) index_html: Arc<PathBuf>,
}

/// Browsers only get CORS headers for the configured origins; `*` opens it up.
pub(crate) fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|origin| origin == "*") {
        AllowOrigin::any()
    } else {
        let allowed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(err) => {
                    warn!(%origin, error = %err, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(allowed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}
