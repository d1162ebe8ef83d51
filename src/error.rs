use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Maps API error: {0}")]
    MapsApi(String),

    #[error("No routes found: {0}")]
    NoRoutesFound(String),

    #[error("Circle boundaries do not intersect")]
    NoIntersection,

    #[error("Invalid encoded path: {0}")]
    Polyline(String),

    #[error("Failed to generate {requested} routes after {failures} consecutive failures")]
    GenerationExhausted { requested: usize, failures: usize },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// Convert AppError into HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::MapsApi(ref e) => {
                tracing::error!("Maps API error: {}", e);
                (StatusCode::BAD_GATEWAY, "Routing service error".to_string())
            }
            AppError::NoRoutesFound(ref e) => {
                tracing::warn!("No routes found: {}", e);
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
            AppError::NoIntersection => {
                tracing::warn!("Route geometry could not be constructed");
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::Polyline(ref e) => {
                tracing::error!("Invalid encoded path from provider: {}", e);
                (StatusCode::BAD_GATEWAY, "Routing service error".to_string())
            }
            AppError::GenerationExhausted { .. } => {
                tracing::warn!("{}", self);
                (StatusCode::UNPROCESSABLE_ENTITY, self.to_string())
            }
            AppError::InvalidRequest(ref e) => (StatusCode::BAD_REQUEST, e.clone()),
        };

        let body = Json(json!({
            "error": status.canonical_reason().unwrap_or("Unknown error"),
            "message": error_message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
