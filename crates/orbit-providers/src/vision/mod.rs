//! Vision provider implementations

pub mod null;
pub mod openai;

pub use null::NullVisionProvider;
pub use openai::OpenAiVisionProvider;
