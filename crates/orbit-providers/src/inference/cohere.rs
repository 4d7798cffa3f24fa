//! Cohere inference provider

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use orbit_application::ports::registry::{
    InferenceProviderEntry, ProviderSettings, INFERENCE_PROVIDERS,
};
use orbit_domain::error::{Error, Result};
use orbit_domain::ports::InferenceProvider;
use orbit_domain::value_objects::ChatMessage;

use crate::constants::{CONTENT_TYPE_JSON, DEFAULT_COHERE_URL, DEFAULT_HTTP_TIMEOUT_SECS};
use crate::utils::HttpResponseUtils;

/// Cohere chat inference provider
#[derive(Debug)]
pub struct CohereInferenceProvider {
    base_url: String,
    api_key: String,
    model: String,
    timeout: Duration,
    http_client: Client,
}

impl CohereInferenceProvider {
    /// Create a new Cohere inference provider
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

    // Cohere's chat history uses USER/CHATBOT roles
    fn chat_history(history: &[ChatMessage]) -> Vec<serde_json::Value> {
        history
            .iter()
            .map(|m| {
                let role = if m.role.eq_ignore_ascii_case("assistant") {
                    "CHATBOT"
                } else {
                    "USER"
                };
                serde_json::json!({"role": role, "message": m.content})
            })
            .collect()
    }
}

#[async_trait]
impl InferenceProvider for CohereInferenceProvider {
    fn provider_name(&self) -> &str {
        "cohere"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    async fn generate(&self, message: &str, history: &[ChatMessage]) -> Result<String> {
        let payload = serde_json::json!({
            "model": self.model,
            "message": message,
            "chat_history": Self::chat_history(history),
        });

        let response = self
            .http_client
            .post(format!("{}/v1/chat", self.base_url.trim_end_matches('/')))
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
        body.get("text")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| Error::provider("Cohere response missing text"))
    }

    async fn close(&self) {}
}

fn cohere_factory(settings: &ProviderSettings) -> Result<Arc<dyn InferenceProvider>> {
    let base_url = settings
        .option_str("base_url")
        .unwrap_or(DEFAULT_COHERE_URL)
        .to_string();
    let api_key = settings.option_str("api_key").unwrap_or("").to_string();
    let model = settings
        .model
        .clone()
        .unwrap_or_else(|| "command-r".to_string());
    let timeout = Duration::from_secs(
        settings
            .option_u64("timeout")
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS),
    );
    let http_client = Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| Error::provider_with_source("failed to create HTTP client", e))?;

    Ok(Arc::new(CohereInferenceProvider::new(
        base_url,
        api_key,
        model,
        timeout,
        http_client,
    )))
}

#[linkme::distributed_slice(INFERENCE_PROVIDERS)]
static COHERE_PROVIDER: InferenceProviderEntry = InferenceProviderEntry {
    name: "cohere",
    description: "Cohere chat inference provider (command-r family)",
    factory: cohere_factory,
};
