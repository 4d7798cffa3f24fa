//! Admin and chat transport for the ORBIT control plane.
//!
//! Thin axum layer over the adapter manager: the reload/list admin
//! endpoints (bearer-auth when enabled), the datasource health
//! aggregate, and the chat entry point that builds a request context
//! and dispatches it through the adapter's resolved providers.

pub mod admin;
pub mod chat;
pub mod error;
pub mod state;

use axum::routing::{get, post};
use axum::Router;

pub use state::AppState;

/// Assemble the HTTP router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(admin::health))
        .route("/admin/reload-adapters", post(admin::reload_adapters))
        .route("/admin/adapters", get(admin::list_adapters))
        .route("/v1/chat", post(chat::chat))
        .with_state(state)
}
