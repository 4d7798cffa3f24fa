//! Embedding provider implementations

pub mod null;
pub mod ollama;
pub mod openai;

pub use null::NullEmbeddingProvider;
pub use ollama::OllamaEmbeddingProvider;
pub use openai::OpenAiEmbeddingProvider;
