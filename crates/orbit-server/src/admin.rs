//! Admin endpoints: reload, adapter list, health
//!
//! When `general.auth.enabled` is set, admin endpoints require
//! `Authorization: Bearer <token>`; token-store internals live outside
//! this layer.

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use orbit_domain::value_objects::ReloadSummary;
use orbit_infrastructure::config::AuthConfig;
use orbit_infrastructure::health;

use crate::error::{error_response, ErrorBody};
use crate::state::AppState;

/// Query parameters for the reload endpoint
#[derive(Debug, Deserialize)]
pub struct ReloadParams {
    /// Restrict the reload to a single adapter
    pub adapter_name: Option<String>,
}

/// Response body for the reload endpoint
#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    /// Aggregate counts plus per-adapter detail
    pub summary: ReloadSummary,
}

/// Check the bearer token when auth is enabled
fn authorize(auth: &AuthConfig, headers: &HeaderMap) -> Result<(), Response> {
    if !auth.enabled {
        return Ok(());
    }
    let Some(expected) = auth.token.as_deref().filter(|t| !t.is_empty()) else {
        warn!("Admin auth enabled but no token configured; rejecting request");
        return Err(unauthorized());
    };
    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    match presented {
        Some(token) if token == expected => Ok(()),
        _ => Err(unauthorized()),
    }
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorBody {
            error: "missing or invalid bearer token".to_string(),
        }),
    )
        .into_response()
}

/// `POST /admin/reload-adapters[?adapter_name=<name>]`
pub async fn reload_adapters(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ReloadParams>,
) -> Response {
    if let Err(response) = authorize(&state.auth, &headers) {
        return response;
    }

    let cancel = CancellationToken::new();
    match state
        .manager
        .reload(params.adapter_name.as_deref(), &cancel)
        .await
    {
        Ok(summary) => Json(ReloadResponse { summary }).into_response(),
        Err(e) => error_response(&e),
    }
}

/// `GET /admin/adapters`
pub async fn list_adapters(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Err(response) = authorize(&state.auth, &headers) {
        return response;
    }
    Json(state.manager.list()).into_response()
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Response {
    let response = health::check_datasources(state.manager.registry()).await;
    // Degraded is still operational; only a full outage turns the
    // endpoint red
    let status = match response.status {
        health::HealthStatus::Down => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::OK,
    };
    (status, Json(response)).into_response()
}
