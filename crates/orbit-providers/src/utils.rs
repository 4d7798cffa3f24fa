//! Shared HTTP helpers for API-backed implementations

use orbit_domain::error::{Error, Result};

/// Utilities for handling HTTP API responses
pub struct HttpResponseUtils;

impl HttpResponseUtils {
    /// Check status and parse a JSON body, attributing failures to the
    /// named backend
    pub async fn check_and_parse(
        response: reqwest::Response,
        backend: &str,
    ) -> Result<serde_json::Value> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::provider(format!(
                "{backend} returned {status}: {body}"
            )));
        }
        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| Error::provider_with_source(format!("{backend} sent invalid JSON"), e))
    }

    /// Map a reqwest error to the domain taxonomy, distinguishing
    /// timeouts from transport failures
    pub fn map_request_error(error: reqwest::Error, backend: &str, timeout_secs: u64) -> Error {
        if error.is_timeout() {
            Error::provider(format!(
                "{} {}s contacting {backend}",
                crate::constants::ERROR_MSG_REQUEST_TIMEOUT,
                timeout_secs
            ))
        } else if error.is_connect() {
            Error::connection_failed_with_source(format!("could not reach {backend}"), error)
        } else {
            Error::provider_with_source(format!("HTTP request to {backend} failed"), error)
        }
    }
}
