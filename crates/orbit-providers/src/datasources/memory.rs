//! In-process memory datasource
//!
//! Backs demos and tests with a plain concurrent map. Pooling behaves
//! exactly like a networked backend: instances with the same namespace
//! share one entry.

use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use orbit_application::ports::registry::{DatasourceEntry, DatasourceSettings, DATASOURCES};
use orbit_domain::error::Result;
use orbit_domain::ports::Datasource;

/// In-memory key-value datasource
pub struct MemoryDatasource {
    namespace: String,
    store: Arc<DashMap<String, String>>,
    initialized: AtomicBool,
}

impl MemoryDatasource {
    /// Create an uninitialized instance for the given namespace
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            store: Arc::new(DashMap::new()),
            initialized: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl Datasource for MemoryDatasource {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn initialize(&self) -> Result<()> {
        if self.initialized.swap(true, Ordering::SeqCst) {
            debug!("memory datasource already initialized");
        }
        Ok(())
    }

    async fn health_check(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    async fn close(&self) {
        self.initialized.store(false, Ordering::SeqCst);
        self.store.clear();
    }

    fn cache_key(&self) -> String {
        format!("memory:{}", self.namespace)
    }

    fn client(&self) -> Option<Arc<dyn Any + Send + Sync>> {
        Some(Arc::clone(&self.store) as Arc<dyn Any + Send + Sync>)
    }
}

fn memory_factory(settings: &DatasourceSettings) -> Result<Arc<dyn Datasource>> {
    let namespace = settings.option_str("namespace").unwrap_or("default");
    Ok(Arc::new(MemoryDatasource::new(namespace)))
}

#[linkme::distributed_slice(DATASOURCES)]
static MEMORY_DATASOURCE: DatasourceEntry = DatasourceEntry {
    name: "memory",
    description: "In-process key-value store for demos and tests",
    factory: memory_factory,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn initialize_is_idempotent_and_close_invalidates() {
        let ds = MemoryDatasource::new("test");
        assert!(!ds.health_check().await);

        ds.initialize().await.unwrap();
        ds.initialize().await.unwrap();
        assert!(ds.health_check().await);

        ds.close().await;
        assert!(!ds.health_check().await);
    }

    #[tokio::test]
    async fn cache_key_depends_on_namespace() {
        assert_eq!(MemoryDatasource::new("a").cache_key(), "memory:a");
        assert_ne!(
            MemoryDatasource::new("a").cache_key(),
            MemoryDatasource::new("b").cache_key()
        );
    }

    #[tokio::test]
    async fn client_downcasts_to_the_shared_map() {
        let ds = MemoryDatasource::new("test");
        ds.initialize().await.unwrap();
        let client = ds.client().unwrap();
        let map = client.downcast::<DashMap<String, String>>().unwrap();
        map.insert("k".into(), "v".into());
        assert_eq!(map.get("k").unwrap().value(), "v");
    }
}
