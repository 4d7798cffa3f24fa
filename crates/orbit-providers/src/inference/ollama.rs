//! Ollama inference provider
//!
//! Implements the InferenceProvider port using Ollama's local chat API.

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

use crate::constants::{CONTENT_TYPE_JSON, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_OLLAMA_URL};
use crate::utils::HttpResponseUtils;

/// Ollama local inference provider
#[derive(Debug)]
pub struct OllamaInferenceProvider {
    base_url: String,
    model: String,
    timeout: Duration,
    http_client: Client,
}

impl OllamaInferenceProvider {
    /// Create a new Ollama inference provider
    pub fn new(base_url: String, model: String, timeout: Duration, http_client: Client) -> Self {
        Self {
            base_url,
            model,
            timeout,
            http_client,
        }
    }

    fn chat_messages(&self, message: &str, history: &[ChatMessage]) -> serde_json::Value {
        let mut messages: Vec<serde_json::Value> = history
            .iter()
            .map(|m| serde_json::json!({"role": m.role, "content": m.content}))
            .collect();
        messages.push(serde_json::json!({"role": "user", "content": message}));
        serde_json::Value::Array(messages)
    }
}

#[async_trait]
impl InferenceProvider for OllamaInferenceProvider {
    fn provider_name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn initialize(&self) -> Result<()> {
        // The client is ready at construction; the first generate call
        // surfaces connectivity problems
        Ok(())
    }

    async fn generate(&self, message: &str, history: &[ChatMessage]) -> Result<String> {
        let payload = serde_json::json!({
            "model": self.model,
            "messages": self.chat_messages(message, history),
            "stream": false
        });

        let response = self
            .http_client
            .post(format!(
                "{}/api/chat",
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
        body.pointer("/message/content")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| Error::provider("Ollama response missing message content"))
    }

    async fn close(&self) {}
}

fn ollama_factory(settings: &ProviderSettings) -> Result<Arc<dyn InferenceProvider>> {
    let base_url = settings
        .option_str("base_url")
        .unwrap_or(DEFAULT_OLLAMA_URL)
        .to_string();
    let model = settings
        .model
        .clone()
        .unwrap_or_else(|| "llama3".to_string());
    let timeout = Duration::from_secs(
        settings
            .option_u64("timeout")
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS),
    );
    let http_client = Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| Error::provider_with_source("failed to create HTTP client", e))?;

    Ok(Arc::new(OllamaInferenceProvider::new(
        base_url,
        model,
        timeout,
        http_client,
    )))
}

#[linkme::distributed_slice(INFERENCE_PROVIDERS)]
static OLLAMA_PROVIDER: InferenceProviderEntry = InferenceProviderEntry {
    name: "ollama",
    description: "Ollama local inference provider (llama3, mistral, etc.)",
    factory: ollama_factory,
};
