//! Inference provider implementations

pub mod cohere;
pub mod null;
pub mod ollama;
pub mod openai;

pub use cohere::CohereInferenceProvider;
pub use null::NullInferenceProvider;
pub use ollama::OllamaInferenceProvider;
pub use openai::OpenAiInferenceProvider;
