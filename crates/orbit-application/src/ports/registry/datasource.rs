//! Datasource implementation registry
//!
//! Each datasource implementation submits a `DatasourceEntry` via
//! `#[linkme::distributed_slice(DATASOURCES)]`. The connection pool
//! resolves implementations by name through this slice.

use std::sync::Arc;

use orbit_domain::error::{Error, Result};
use orbit_domain::ports::Datasource;
use serde_json::Value;

/// Configuration handed to datasource factories
#[derive(Debug, Clone, Default)]
pub struct DatasourceSettings {
    /// Datasource name (e.g. `postgres`, `elasticsearch`)
    pub provider: String,
    /// The `datasources.<name>` config sub-tree
    pub options: Value,
}

impl DatasourceSettings {
    /// Create settings for the given datasource name
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            ..Default::default()
        }
    }

    /// Set the config sub-tree
    pub fn with_options(mut self, options: Value) -> Self {
        self.options = options;
        self
    }

    /// Read a string option
    pub fn option_str(&self, key: &str) -> Option<&str> {
        self.options.get(key).and_then(Value::as_str)
    }

    /// Read an integer option
    pub fn option_u64(&self, key: &str) -> Option<u64> {
        self.options.get(key).and_then(Value::as_u64)
    }
}

/// Registry entry for datasource implementations
pub struct DatasourceEntry {
    /// Unique datasource name
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Factory function to create an unconnected instance; the pool
    /// calls `initialize` separately
    pub factory: fn(&DatasourceSettings) -> Result<Arc<dyn Datasource>>,
}

// Auto-collection via linkme distributed slices - implementations
// submit entries at compile time
#[linkme::distributed_slice]
pub static DATASOURCES: [DatasourceEntry] = [..];

/// Resolve a datasource implementation by name and build an
/// unconnected candidate instance
pub fn resolve_datasource(settings: &DatasourceSettings) -> Result<Arc<dyn Datasource>> {
    for entry in DATASOURCES {
        if entry.name == settings.provider {
            return (entry.factory)(settings);
        }
    }

    let available: Vec<&str> = DATASOURCES.iter().map(|e| e.name).collect();
    Err(Error::not_found(format!(
        "datasource implementation '{}' (available: {:?})",
        settings.provider, available
    )))
}

/// List all registered datasource implementations as
/// `(name, description)` pairs
pub fn list_datasources() -> Vec<(&'static str, &'static str)> {
    DATASOURCES.iter().map(|e| (e.name, e.description)).collect()
}
