//! Vision provider registry

use std::sync::Arc;

use orbit_domain::error::{Error, Result};
use orbit_domain::ports::VisionProvider;
use orbit_domain::value_objects::ProviderKind;

use super::ProviderSettings;

/// Registry entry for vision providers
pub struct VisionProviderEntry {
    /// Unique provider name
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Factory function to create provider instances
    pub factory: fn(&ProviderSettings) -> Result<Arc<dyn VisionProvider>>,
}

#[linkme::distributed_slice]
pub static VISION_PROVIDERS: [VisionProviderEntry] = [..];

/// Resolve a vision provider by name from the registry
pub fn resolve_vision_provider(settings: &ProviderSettings) -> Result<Arc<dyn VisionProvider>> {
    for entry in VISION_PROVIDERS {
        if entry.name == settings.provider {
            return (entry.factory)(settings);
        }
    }
    Err(Error::not_configured(
        ProviderKind::Vision,
        &settings.provider,
    ))
}

/// List all registered vision providers
pub fn list_vision_providers() -> Vec<(&'static str, &'static str)> {
    VISION_PROVIDERS
        .iter()
        .map(|e| (e.name, e.description))
        .collect()
}
