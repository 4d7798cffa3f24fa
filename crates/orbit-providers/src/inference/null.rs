//! Null inference provider
//!
//! Deterministic echo used by tests and as a safe default when no real
//! backend is reachable.

use std::sync::Arc;

use async_trait::async_trait;

use orbit_application::ports::registry::{
    InferenceProviderEntry, ProviderSettings, INFERENCE_PROVIDERS,
};
use orbit_domain::error::Result;
use orbit_domain::ports::InferenceProvider;
use orbit_domain::value_objects::ChatMessage;

/// Inference provider that echoes its input
#[derive(Debug)]
pub struct NullInferenceProvider {
    model: String,
}

impl NullInferenceProvider {
    /// Create a null provider reporting the given model name
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
        }
    }
}

#[async_trait]
impl InferenceProvider for NullInferenceProvider {
    fn provider_name(&self) -> &str {
        "null"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    async fn generate(&self, message: &str, history: &[ChatMessage]) -> Result<String> {
        Ok(format!(
            "[{} turn {}] {}",
            self.model,
            history.len() + 1,
            message
        ))
    }

    async fn close(&self) {}
}

fn null_factory(settings: &ProviderSettings) -> Result<Arc<dyn InferenceProvider>> {
    let model = settings.model.clone().unwrap_or_else(|| "null".to_string());
    Ok(Arc::new(NullInferenceProvider::new(model)))
}

#[linkme::distributed_slice(INFERENCE_PROVIDERS)]
static NULL_PROVIDER: InferenceProviderEntry = InferenceProviderEntry {
    name: "null",
    description: "Deterministic echo provider for tests and dry runs",
    factory: null_factory,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn echoes_message_with_turn_count() {
        let provider = NullInferenceProvider::new("null-small");
        let history = vec![ChatMessage::new("user", "earlier")];
        let out = provider.generate("hello", &history).await.unwrap();
        assert_eq!(out, "[null-small turn 2] hello");
    }
}
