//! Application use cases

pub mod context_builder;

pub use context_builder::{ContextParams, RequestContextBuilder};
