//! Error-to-response mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use orbit_domain::error::Error;

/// JSON error body returned by every endpoint
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable error message
    pub error: String,
}

/// Map a domain error to an HTTP response
pub fn error_response(error: &Error) -> Response {
    let status = match error {
        Error::UnknownAdapter { .. } | Error::NotFound { .. } => StatusCode::NOT_FOUND,
        Error::AdapterDisabled { .. } => StatusCode::CONFLICT,
        Error::NotConfigured { .. } | Error::ProviderDisabled { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        Error::ConnectionFailed { .. } | Error::HealthFailed { .. } => StatusCode::BAD_GATEWAY,
        Error::DependencyMissing { .. } => StatusCode::NOT_IMPLEMENTED,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorBody {
            error: error.to_string(),
        }),
    )
        .into_response()
}
