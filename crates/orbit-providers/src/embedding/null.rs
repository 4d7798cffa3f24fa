//! Null embedding provider

use std::sync::Arc;

use async_trait::async_trait;

use orbit_application::ports::registry::{
    EmbeddingProviderEntry, ProviderSettings, EMBEDDING_PROVIDERS,
};
use orbit_domain::error::Result;
use orbit_domain::ports::EmbeddingProvider;

use crate::constants::NULL_EMBEDDING_DIMENSIONS;

/// Embedding provider returning zero vectors
pub struct NullEmbeddingProvider {
    dimensions: usize,
}

impl NullEmbeddingProvider {
    /// Create a null provider with the given dimensionality
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

#[async_trait]
impl EmbeddingProvider for NullEmbeddingProvider {
    fn provider_name(&self) -> &str {
        "null"
    }

    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|_| vec![0.0; self.dimensions]).collect())
    }

    async fn close(&self) {}
}

fn null_factory(settings: &ProviderSettings) -> Result<Arc<dyn EmbeddingProvider>> {
    let dimensions = settings
        .option_u64("dimensions")
        .map(|d| d as usize)
        .unwrap_or(NULL_EMBEDDING_DIMENSIONS);
    Ok(Arc::new(NullEmbeddingProvider::new(dimensions)))
}

#[linkme::distributed_slice(EMBEDDING_PROVIDERS)]
static NULL_PROVIDER: EmbeddingProviderEntry = EmbeddingProviderEntry {
    name: "null",
    description: "Zero-vector embedding provider for tests",
    factory: null_factory,
};
