//! Auto-registration registries
//!
//! Datasource and provider implementations register themselves via
//! `#[linkme::distributed_slice]` and are discovered at runtime by
//! name. This replaces import-time package walking with an explicit,
//! race-free registration step.

pub mod datasource;
pub mod embedding;
pub mod inference;
pub mod reranker;
pub mod vision;

pub use datasource::{
    list_datasources, resolve_datasource, DatasourceEntry, DatasourceSettings, DATASOURCES,
};
pub use embedding::{resolve_embedding_provider, EmbeddingProviderEntry, EMBEDDING_PROVIDERS};
pub use inference::{resolve_inference_provider, InferenceProviderEntry, INFERENCE_PROVIDERS};
pub use reranker::{resolve_reranker_provider, RerankerProviderEntry, RERANKER_PROVIDERS};
pub use vision::{resolve_vision_provider, VisionProviderEntry, VISION_PROVIDERS};

use serde_json::Value;

/// Configuration handed to provider factories
///
/// Contains the provider name, the effective model, and the provider's
/// merged config section. Factories use what they need and ignore the
/// rest.
#[derive(Debug, Clone, Default)]
pub struct ProviderSettings {
    /// Provider name (e.g. `ollama`, `openai`, `cohere`)
    pub provider: String,
    /// Effective model: the adapter's override when present, else the
    /// section's configured model
    pub model: Option<String>,
    /// The provider's merged config section (`inference.<name>`, ...)
    pub options: Value,
}

impl ProviderSettings {
    /// Create settings for the given provider name
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            ..Default::default()
        }
    }

    /// Set the effective model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the merged config section
    pub fn with_options(mut self, options: Value) -> Self {
        self.options = options;
        self
    }

    /// Read a string option from the config section
    pub fn option_str(&self, key: &str) -> Option<&str> {
        self.options.get(key).and_then(Value::as_str)
    }

    /// Read an integer option from the config section
    pub fn option_u64(&self, key: &str) -> Option<u64> {
        self.options.get(key).and_then(Value::as_u64)
    }
}
