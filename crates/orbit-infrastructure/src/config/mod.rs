//! Configuration management
//!
//! YAML loading with recursive `import:` merging, `${ENV}` substitution,
//! structural validation, a TTL-bounded cache, and catalog extraction.

pub mod catalog;
pub mod loader;
pub mod types;

pub use catalog::load_catalog;
pub use loader::ConfigManager;
pub use types::{AuthConfig, GeneralConfig, LoggingConfig};
