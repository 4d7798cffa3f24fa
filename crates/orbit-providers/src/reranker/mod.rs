//! Reranker provider implementations

pub mod cohere;
pub mod null;

pub use cohere::CohereRerankerProvider;
pub use null::NullRerankerProvider;
