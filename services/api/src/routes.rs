use crate::infra::{AppState, SharedService};
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use payout_engine::error::AppError;
use payout_engine::workflows::extraction::UploadedImage;
use payout_engine::workflows::payout::RuleView;
use payout_engine::workflows::pipeline::ProcessingOutcome;
use serde_json::json;
use tracing::{debug, error, warn};

const COMPANY_FIELD: &str = "company_name";
const FILE_FIELD: &str = "policy_file";
const INDEX_BANNER: &str =
    "<!doctype html><html><body><h1>Rate Card Payout Engine</h1><p>POST a rate card image to /process.</p></body></html>";

pub(crate) fn router(service: SharedService) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/process", post(process_endpoint))
        .route("/api/v1/rules", get(rules_endpoint))
        .with_state(service)
}

pub(crate) async fn index(Extension(state): Extension<AppState>) -> Response {
    let path = state.index_html.as_path();
    match tokio::fs::read(path).await {
        Ok(body) => {
            let content_type = mime_guess::from_path(path)
                .first_raw()
                .unwrap_or("text/html; charset=utf-8");
            ([(header::CONTENT_TYPE, content_type)], body).into_response()
        }
        Err(err) => {
            debug!(path = %path.display(), error = %err, "index page unavailable");
            Html(INDEX_BANNER).into_response()
        }
    }
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

pub(crate) async fn rules_endpoint(State(service): State<SharedService>) -> Json<Vec<RuleView>> {
    Json(service.engine().table().views())
}

pub(crate) async fn process_endpoint(
    State(service): State<SharedService>,
    mut multipart: Multipart,
) -> Result<Json<ProcessingOutcome>, AppError> {
    let mut company_name = None;
    let mut upload = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            COMPANY_FIELD => {
                company_name = Some(field.text().await.map_err(multipart_error)?);
            }
            FILE_FIELD => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(multipart_error)?;
                upload = Some(UploadedImage::new(filename, content_type, bytes.to_vec()));
            }
            other => debug!(field = other, "ignoring unexpected form field"),
        }
    }

    let company_name = company_name.ok_or_else(|| missing_field(COMPANY_FIELD))?;
    let upload = upload.ok_or_else(|| missing_field(FILE_FIELD))?;

    let outcome = service
        .process(upload, company_name.trim())
        .await
        .map_err(|err| {
            if err.is_client_error() {
                warn!(error = %err, "rate card rejected");
            } else {
                error!(error = %err, "rate card processing failed");
            }
            AppError::from(err)
        })?;

    Ok(Json(outcome))
}

fn missing_field(name: &str) -> AppError {
    AppError::BadRequest(format!("Missing form field: {name}"))
}

fn multipart_error(err: MultipartError) -> AppError {
    AppError::BadRequest(err.body_text())
}
