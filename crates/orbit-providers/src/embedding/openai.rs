//! OpenAI embedding provider

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use orbit_application::ports::registry::{
    EmbeddingProviderEntry, ProviderSettings, EMBEDDING_PROVIDERS,
};
use orbit_domain::error::{Error, Result};
use orbit_domain::ports::EmbeddingProvider;

use crate::constants::{CONTENT_TYPE_JSON, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_OPENAI_URL};
use crate::utils::HttpResponseUtils;

/// OpenAI embeddings API provider
pub struct OpenAiEmbeddingProvider {
    base_url: String,
    api_key: String,
    model: String,
    timeout: Duration,
    http_client: Client,
}

impl OpenAiEmbeddingProvider {
    /// Create a new OpenAI embedding provider
    pub fn new(
        base_url: String,
        api_key: String,
        model: String,
        timeout: Duration,
        http_client: Client,
    ) -> Self {
        Self {
            base_url,
            api_key,
            model,
            timeout,
            http_client,
        }
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    fn provider_name(&self) -> &str {
        "openai"
    }

    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let payload = serde_json::json!({
            "model": self.model,
            "input": texts,
        });

        let response = self
            .http_client
            .post(format!(
                "{}/v1/embeddings",
                self.base_url.trim_end_matches('/')
            ))
            .header("Content-Type", CONTENT_TYPE_JSON)
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                HttpResponseUtils::map_request_error(e, "OpenAI", self.timeout.as_secs())
            })?;

        let body = HttpResponseUtils::check_and_parse(response, "OpenAI").await?;
        let data = body
            .get("data")
            .and_then(serde_json::Value::as_array)
            .ok_or_else(|| Error::provider("OpenAI response missing data array"))?;

        data.iter()
            .map(|item| {
                item.get("embedding")
                    .and_then(serde_json::Value::as_array)
                    .map(|values| {
                        values
                            .iter()
                            .map(|v| v.as_f64().unwrap_or(0.0) as f32)
                            .collect::<Vec<f32>>()
                    })
                    .ok_or_else(|| Error::provider("OpenAI response item missing embedding"))
            })
            .collect()
    }

    async fn close(&self) {}
}

fn openai_factory(settings: &ProviderSettings) -> Result<Arc<dyn EmbeddingProvider>> {
    let base_url = settings
        .option_str("base_url")
        .unwrap_or(DEFAULT_OPENAI_URL)
        .to_string();
    let api_key = settings.option_str("api_key").unwrap_or("").to_string();
    let model = settings
        .model
        .clone()
        .unwrap_or_else(|| "text-embedding-3-small".to_string());
    let timeout = Duration::from_secs(
        settings
            .option_u64("timeout")
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS),
    );
    let http_client = Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| Error::provider_with_source("failed to create HTTP client", e))?;

    Ok(Arc::new(OpenAiEmbeddingProvider::new(
        base_url,
        api_key,
        model,
        timeout,
        http_client,
    )))
}

#[linkme::distributed_slice(EMBEDDING_PROVIDERS)]
static OPENAI_PROVIDER: EmbeddingProviderEntry = EmbeddingProviderEntry {
    name: "openai",
    description: "OpenAI embeddings API provider",
    factory: openai_factory,
};
