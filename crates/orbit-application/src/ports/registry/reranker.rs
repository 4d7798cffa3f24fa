//! Reranker provider registry

use std::sync::Arc;

use orbit_domain::error::{Error, Result};
use orbit_domain::ports::RerankerProvider;
use orbit_domain::value_objects::ProviderKind;

use super::ProviderSettings;

/// Registry entry for reranker providers
pub struct RerankerProviderEntry {
    /// Unique provider name
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Factory function to create provider instances
    pub factory: fn(&ProviderSettings) -> Result<Arc<dyn RerankerProvider>>,
}

#[linkme::distributed_slice]
pub static RERANKER_PROVIDERS: [RerankerProviderEntry] = [..];

/// Resolve a reranker provider by name from the registry
pub fn resolve_reranker_provider(
    settings: &ProviderSettings,
) -> Result<Arc<dyn RerankerProvider>> {
    for entry in RERANKER_PROVIDERS {
        if entry.name == settings.provider {
            return (entry.factory)(settings);
        }
    }
    Err(Error::not_configured(
        ProviderKind::Reranker,
        &settings.provider,
    ))
}

/// List all registered reranker providers
pub fn list_reranker_providers() -> Vec<(&'static str, &'static str)> {
    RERANKER_PROVIDERS
        .iter()
        .map(|e| (e.name, e.description))
        .collect()
}
