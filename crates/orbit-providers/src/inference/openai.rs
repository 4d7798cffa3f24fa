//! OpenAI-compatible inference provider
//!
//! Speaks the `/v1/chat/completions` wire format, which several vendors
//! expose; the base URL is configurable for compatible servers.

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

use crate::constants::{CONTENT_TYPE_JSON, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_OPENAI_URL};
use crate::utils::HttpResponseUtils;

/// OpenAI chat-completions inference provider
#[derive(Debug)]
pub struct OpenAiInferenceProvider {
    base_url: String,
    api_key: String,
    model: String,
    timeout: Duration,
    http_client: Client,
}

impl OpenAiInferenceProvider {
    /// Create a new OpenAI inference provider
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
impl InferenceProvider for OpenAiInferenceProvider {
    fn provider_name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    async fn generate(&self, message: &str, history: &[ChatMessage]) -> Result<String> {
        let mut messages: Vec<serde_json::Value> = history
            .iter()
            .map(|m| serde_json::json!({"role": m.role, "content": m.content}))
            .collect();
        messages.push(serde_json::json!({"role": "user", "content": message}));

        let payload = serde_json::json!({
            "model": self.model,
            "messages": messages,
        });

        let response = self
            .http_client
            .post(format!(
                "{}/v1/chat/completions",
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
        body.pointer("/choices/0/message/content")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| Error::provider("OpenAI response missing choices content"))
    }

    async fn close(&self) {}
}

fn openai_factory(settings: &ProviderSettings) -> Result<Arc<dyn InferenceProvider>> {
    let base_url = settings
        .option_str("base_url")
        .unwrap_or(DEFAULT_OPENAI_URL)
        .to_string();
    let api_key = settings.option_str("api_key").unwrap_or("").to_string();
    let model = settings
        .model
        .clone()
        .unwrap_or_else(|| "gpt-4o-mini".to_string());
    let timeout = Duration::from_secs(
        settings
            .option_u64("timeout")
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS),
    );
    let http_client = Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| Error::provider_with_source("failed to create HTTP client", e))?;

    Ok(Arc::new(OpenAiInferenceProvider::new(
        base_url,
        api_key,
        model,
        timeout,
        http_client,
    )))
}

#[linkme::distributed_slice(INFERENCE_PROVIDERS)]
static OPENAI_PROVIDER: InferenceProviderEntry = InferenceProviderEntry {
    name: "openai",
    description: "OpenAI chat-completions inference provider",
    factory: openai_factory,
};
