//! Port traits implemented by datasources and providers

pub mod datasource;
pub mod providers;

pub use datasource::Datasource;
pub use providers::{EmbeddingProvider, InferenceProvider, RerankerProvider, VisionProvider};
