//! Cohere reranker provider

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use orbit_application::ports::registry::{
    ProviderSettings, RerankerProviderEntry, RERANKER_PROVIDERS,
};
use orbit_domain::error::{Error, Result};
use orbit_domain::ports::RerankerProvider;

use crate::constants::{CONTENT_TYPE_JSON, DEFAULT_COHERE_URL, DEFAULT_HTTP_TIMEOUT_SECS};
use crate::utils::HttpResponseUtils;

/// Cohere rerank API provider
pub struct CohereRerankerProvider {
    base_url: String,
    api_key: String,
    model: String,
    timeout: Duration,
    http_client: Client,
}

impl CohereRerankerProvider {
    /// Create a new Cohere reranker provider
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
impl RerankerProvider for CohereRerankerProvider {
    fn provider_name(&self) -> &str {
        "cohere"
    }

    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    async fn rerank(&self, query: &str, documents: &[String]) -> Result<Vec<(usize, f32)>> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }

        let payload = serde_json::json!({
            "model": self.model,
            "query": query,
            "documents": documents,
        });

        let response = self
            .http_client
            .post(format!("{}/v1/rerank", self.base_url.trim_end_matches('/')))
            .header("Content-Type", CONTENT_TYPE_JSON)
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                HttpResponseUtils::map_request_error(e, "Cohere", self.timeout.as_secs())
            })?;

        let body = HttpResponseUtils::check_and_parse(response, "Cohere").await?;
        let results = body
            .get("results")
            .and_then(serde_json::Value::as_array)
            .ok_or_else(|| Error::provider("Cohere rerank response missing results"))?;

        Ok(results
            .iter()
            .filter_map(|item| {
                let index = item.get("index")?.as_u64()? as usize;
                let score = item.get("relevance_score")?.as_f64()? as f32;
                Some((index, score))
            })
            .collect())
    }

    async fn close(&self) {}
}

fn cohere_factory(settings: &ProviderSettings) -> Result<Arc<dyn RerankerProvider>> {
    let base_url = settings
        .option_str("base_url")
        .unwrap_or(DEFAULT_COHERE_URL)
        .to_string();
    let api_key = settings.option_str("api_key").unwrap_or("").to_string();
    let model = settings
        .model
        .clone()
        .unwrap_or_else(|| "rerank-english-v3.0".to_string());
    let timeout = Duration::from_secs(
        settings
            .option_u64("timeout")
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS),
    );
    let http_client = Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| Error::provider_with_source("failed to create HTTP client", e))?;

    Ok(Arc::new(CohereRerankerProvider::new(
        base_url,
        api_key,
        model,
        timeout,
        http_client,
    )))
}

#[linkme::distributed_slice(RERANKER_PROVIDERS)]
static COHERE_PROVIDER: RerankerProviderEntry = RerankerProviderEntry {
    name: "cohere",
    description: "Cohere rerank API provider",
    factory: cohere_factory,
};
