//! Embedding provider registry

use std::sync::Arc;

use orbit_domain::error::{Error, Result};
use orbit_domain::ports::EmbeddingProvider;
use orbit_domain::value_objects::ProviderKind;

use super::ProviderSettings;

/// Registry entry for embedding providers
pub struct EmbeddingProviderEntry {
    /// Unique provider name
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Factory function to create provider instances
    pub factory: fn(&ProviderSettings) -> Result<Arc<dyn EmbeddingProvider>>,
}

#[linkme::distributed_slice]
pub static EMBEDDING_PROVIDERS: [EmbeddingProviderEntry] = [..];

/// Resolve an embedding provider by name from the registry
pub fn resolve_embedding_provider(
    settings: &ProviderSettings,
) -> Result<Arc<dyn EmbeddingProvider>> {
    for entry in EMBEDDING_PROVIDERS {
        if entry.name == settings.provider {
            return (entry.factory)(settings);
        }
    }
    Err(Error::not_configured(
        ProviderKind::Embedding,
        &settings.provider,
    ))
}

/// List all registered embedding providers
pub fn list_embedding_providers() -> Vec<(&'static str, &'static str)> {
    EMBEDDING_PROVIDERS
        .iter()
        .map(|e| (e.name, e.description))
        .collect()
}
