use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::extraction::ExtractionError;
use crate::workflows::pipeline::PipelineError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Extraction(ExtractionError),
    Pipeline(PipelineError),
    BadRequest(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Extraction(err) => write!(f, "extraction error: {}", err),
            AppError::Pipeline(err) => write!(f, "{}", err),
            AppError::BadRequest(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Extraction(err) => Some(err),
            AppError::Pipeline(err) => Some(err),
            AppError::BadRequest(_) => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::Pipeline(err) if err.is_client_error() => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            AppError::Pipeline(_)
            | AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Extraction(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Processing failed: {self}"),
            ),
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<ExtractionError> for AppError {
    fn from(value: ExtractionError) -> Self {
        Self::Extraction(value)
    }
}

impl From<PipelineError> for AppError {
    fn from(value: PipelineError) -> Self {
        Self::Pipeline(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::extraction::UploadError;

    #[test]
    fn client_errors_map_to_bad_request() {
        let response = AppError::from(PipelineError::NoTextExtracted).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AppError::from(PipelineError::Upload(UploadError::Empty)).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AppError::BadRequest("missing policy_file".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn service_failures_map_to_server_error() {
        let response = AppError::from(ConfigError::MissingApiKey).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
