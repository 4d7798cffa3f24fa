//! OpenAI vision provider
//!
//! Sends the image as a data URL through the chat-completions API.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use orbit_application::ports::registry::{ProviderSettings, VisionProviderEntry, VISION_PROVIDERS};
use orbit_domain::error::{Error, Result};
use orbit_domain::ports::VisionProvider;

use crate::constants::{CONTENT_TYPE_JSON, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_OPENAI_URL};
use crate::utils::HttpResponseUtils;

/// OpenAI chat-completions vision provider
pub struct OpenAiVisionProvider {
    base_url: String,
    api_key: String,
    model: String,
    timeout: Duration,
    http_client: Client,
}

impl OpenAiVisionProvider {
    /// Create a new OpenAI vision provider
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
impl VisionProvider for OpenAiVisionProvider {
    fn provider_name(&self) -> &str {
        "openai"
    }

    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    async fn describe(&self, image_base64: &str, prompt: &str) -> Result<String> {
        let payload = serde_json::json!({
            "model": self.model,
            "messages": [{
                "role": "user",
                "content": [
                    {"type": "text", "text": prompt},
                    {
                        "type": "image_url",
                        "image_url": {"url": format!("data:image/jpeg;base64,{image_base64}")}
                    }
                ]
            }],
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
            .ok_or_else(|| Error::provider("OpenAI vision response missing content"))
    }

    async fn close(&self) {}
}

fn openai_factory(settings: &ProviderSettings) -> Result<Arc<dyn VisionProvider>> {
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

    Ok(Arc::new(OpenAiVisionProvider::new(
        base_url,
        api_key,
        model,
        timeout,
        http_client,
    )))
}

#[linkme::distributed_slice(VISION_PROVIDERS)]
static OPENAI_PROVIDER: VisionProviderEntry = VisionProviderEntry {
    name: "openai",
    description: "OpenAI chat-completions vision provider",
    factory: openai_factory,
};
