//! HTTP placeholder datasource
//!
//! HTTP-backed adapters manage their own clients per adapter (each API
//! has a different base URL and auth), so there is no central client to
//! pool. This datasource exists to satisfy the registry pattern.

use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use orbit_application::ports::registry::{DatasourceEntry, DatasourceSettings, DATASOURCES};
use orbit_domain::error::Result;
use orbit_domain::ports::Datasource;

/// Placeholder datasource for HTTP-based adapters
pub struct HttpDatasource {
    initialized: AtomicBool,
}

impl HttpDatasource {
    /// Create a placeholder instance
    pub fn new() -> Self {
        Self {
            initialized: AtomicBool::new(false),
        }
    }
}

impl Default for HttpDatasource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Datasource for HttpDatasource {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn initialize(&self) -> Result<()> {
        if !self.initialized.swap(true, Ordering::SeqCst) {
            debug!("http datasource initialized (no centralized connection needed)");
        }
        Ok(())
    }

    async fn health_check(&self) -> bool {
        // No central connection to probe; adapters check their own
        true
    }

    async fn close(&self) {
        self.initialized.store(false, Ordering::SeqCst);
    }

    fn cache_key(&self) -> String {
        // Adapter-specific clients make instances interchangeable
        "http:placeholder".to_string()
    }

    fn client(&self) -> Option<Arc<dyn Any + Send + Sync>> {
        None
    }
}

fn http_factory(_settings: &DatasourceSettings) -> Result<Arc<dyn Datasource>> {
    Ok(Arc::new(HttpDatasource::new()))
}

#[linkme::distributed_slice(DATASOURCES)]
static HTTP_DATASOURCE: DatasourceEntry = DatasourceEntry {
    name: "http",
    description: "Placeholder for adapters that manage their own HTTP clients",
    factory: http_factory,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn placeholder_is_always_healthy_with_no_client() {
        let ds = HttpDatasource::new();
        ds.initialize().await.unwrap();
        assert!(ds.health_check().await);
        assert!(ds.client().is_none());
        assert_eq!(ds.cache_key(), "http:placeholder");
    }
}
