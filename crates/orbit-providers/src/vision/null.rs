//! Null vision provider

use std::sync::Arc;

use async_trait::async_trait;

use orbit_application::ports::registry::{ProviderSettings, VisionProviderEntry, VISION_PROVIDERS};
use orbit_domain::error::Result;
use orbit_domain::ports::VisionProvider;

/// Vision provider that echoes the prompt without looking at the image
pub struct NullVisionProvider;

#[async_trait]
impl VisionProvider for NullVisionProvider {
    fn provider_name(&self) -> &str {
        "null"
    }

    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    async fn describe(&self, _image_base64: &str, prompt: &str) -> Result<String> {
        Ok(format!("[null vision] {prompt}"))
    }

    async fn close(&self) {}
}

fn null_factory(_settings: &ProviderSettings) -> Result<Arc<dyn VisionProvider>> {
    Ok(Arc::new(NullVisionProvider))
}

#[linkme::distributed_slice(VISION_PROVIDERS)]
static NULL_PROVIDER: VisionProviderEntry = VisionProviderEntry {
    name: "null",
    description: "Echo vision provider for tests",
    factory: null_factory,
};
