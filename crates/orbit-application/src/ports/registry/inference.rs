//! Inference provider registry

use std::sync::Arc;

use orbit_domain::error::{Error, Result};
use orbit_domain::ports::InferenceProvider;
use orbit_domain::value_objects::ProviderKind;

use super::ProviderSettings;

/// Registry entry for inference providers
pub struct InferenceProviderEntry {
    /// Unique provider name (e.g. `ollama`, `openai`, `cohere`)
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Factory function to create provider instances
    pub factory: fn(&ProviderSettings) -> Result<Arc<dyn InferenceProvider>>,
}

#[linkme::distributed_slice]
pub static INFERENCE_PROVIDERS: [InferenceProviderEntry] = [..];

/// Resolve an inference provider by name from the registry
pub fn resolve_inference_provider(
    settings: &ProviderSettings,
) -> Result<Arc<dyn InferenceProvider>> {
    for entry in INFERENCE_PROVIDERS {
        if entry.name == settings.provider {
            return (entry.factory)(settings);
        }
    }
    Err(Error::not_configured(
        ProviderKind::Inference,
        &settings.provider,
    ))
}

/// List all registered inference providers
pub fn list_inference_providers() -> Vec<(&'static str, &'static str)> {
    INFERENCE_PROVIDERS
        .iter()
        .map(|e| (e.name, e.description))
        .collect()
}
