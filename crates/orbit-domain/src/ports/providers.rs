//! Provider ports for the four backend kinds
//!
//! Handles are constructed by the provider factory from config and
//! cached by `(kind, name, model_override)`. All lifecycle methods are
//! async; construction itself never dials the network.

use async_trait::async_trait;

use crate::error::Result;
use crate::value_objects::ChatMessage;

/// Chat/completion inference backend
#[async_trait]
pub trait InferenceProvider: Send + Sync + std::fmt::Debug {
    /// Provider name as registered (`ollama`, `openai`, `cohere`, ...)
    fn provider_name(&self) -> &str;

    /// Model this handle generates with
    fn model(&self) -> &str;

    /// Prepare the provider for use. Idempotent.
    async fn initialize(&self) -> Result<()>;

    /// Generate a response for `message` given the prior conversation
    async fn generate(&self, message: &str, history: &[ChatMessage]) -> Result<String>;

    /// Release resources held by this handle
    async fn close(&self);
}

/// Embedding backend
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Provider name as registered
    fn provider_name(&self) -> &str;

    /// Prepare the provider for use. Idempotent.
    async fn initialize(&self) -> Result<()>;

    /// Embed a batch of texts, one vector per input, in order
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Release resources held by this handle
    async fn close(&self);
}

/// Rerank backend
#[async_trait]
pub trait RerankerProvider: Send + Sync {
    /// Provider name as registered
    fn provider_name(&self) -> &str;

    /// Prepare the provider for use. Idempotent.
    async fn initialize(&self) -> Result<()>;

    /// Score `documents` against `query`; returns `(index, score)`
    /// pairs sorted by descending relevance
    async fn rerank(&self, query: &str, documents: &[String]) -> Result<Vec<(usize, f32)>>;

    /// Release resources held by this handle
    async fn close(&self);
}

/// Vision backend
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Provider name as registered
    fn provider_name(&self) -> &str;

    /// Prepare the provider for use. Idempotent.
    async fn initialize(&self) -> Result<()>;

    /// Describe a base64-encoded image, guided by `prompt`
    async fn describe(&self, image_base64: &str, prompt: &str) -> Result<String>;

    /// Release resources held by this handle
    async fn close(&self);
}
