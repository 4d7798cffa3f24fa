//! Ollama embedding provider
//!
//! Uses Ollama's local embedding API. The API has no batch endpoint, so
//! batches are processed sequentially.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use orbit_application::ports::registry::{
    EmbeddingProviderEntry, ProviderSettings, EMBEDDING_PROVIDERS,
};
use orbit_domain::error::{Error, Result};
use orbit_domain::ports::EmbeddingProvider;

use crate::constants::{CONTENT_TYPE_JSON, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_OLLAMA_URL};
use crate::utils::HttpResponseUtils;

/// Ollama local embedding provider
pub struct OllamaEmbeddingProvider {
    base_url: String,
    model: String,
    timeout: Duration,
    http_client: Client,
}

impl OllamaEmbeddingProvider {
    /// Create a new Ollama embedding provider
    pub fn new(base_url: String, model: String, timeout: Duration, http_client: Client) -> Self {
        Self {
            base_url,
            model,
            timeout,
            http_client,
        }
    }

    async fn fetch_single_embedding(&self, text: &str) -> Result<Vec<f32>> {
        let payload = serde_json::json!({
            "model": self.model,
            "prompt": text,
        });

        let response = self
            .http_client
            .post(format!(
                "{}/api/embeddings",
                self.base_url.trim_end_matches('/')
            ))
            .header("Content-Type", CONTENT_TYPE_JSON)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                HttpResponseUtils::map_request_error(e, "Ollama", self.timeout.as_secs())
            })?;

        let body = HttpResponseUtils::check_and_parse(response, "Ollama").await?;
        body.get("embedding")
            .and_then(serde_json::Value::as_array)
            .map(|values| {
                values
                    .iter()
                    .map(|v| v.as_f64().unwrap_or(0.0) as f32)
                    .collect()
            })
            .ok_or_else(|| Error::provider("Ollama response missing embedding array"))
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbeddingProvider {
    fn provider_name(&self) -> &str {
        "ollama"
    }

    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.fetch_single_embedding(text).await?);
        }
        Ok(results)
    }

    async fn close(&self) {}
}

fn ollama_factory(settings: &ProviderSettings) -> Result<Arc<dyn EmbeddingProvider>> {
    let base_url = settings
        .option_str("base_url")
        .unwrap_or(DEFAULT_OLLAMA_URL)
        .to_string();
    let model = settings
        .model
        .clone()
        .unwrap_or_else(|| "nomic-embed-text".to_string());
    let timeout = Duration::from_secs(
        settings
            .option_u64("timeout")
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS),
    );
    let http_client = Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| Error::provider_with_source("failed to create HTTP client", e))?;

    Ok(Arc::new(OllamaEmbeddingProvider::new(
        base_url,
        model,
        timeout,
        http_client,
    )))
}

#[linkme::distributed_slice(EMBEDDING_PROVIDERS)]
static OLLAMA_PROVIDER: EmbeddingProviderEntry = EmbeddingProviderEntry {
    name: "ollama",
    description: "Ollama local embedding provider (nomic-embed-text, all-minilm, etc.)",
    factory: ollama_factory,
};
