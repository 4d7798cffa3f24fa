//! Adapter descriptor - the canonical definition of one adapter
//!
//! A descriptor is the config-level declaration of an adapter: which
//! datasource it targets, which providers it overrides, and its
//! free-form nested options. Two descriptors with the same name at
//! different times are the same adapter undergoing change.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// The canonical definition of one adapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdapterDescriptor {
    /// Unique, non-empty identifier across the catalog
    pub name: String,

    /// Whether the adapter should be materialized with live resources
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Logical datasource name resolved through the registry
    #[serde(default = "default_datasource", alias = "datasource")]
    pub datasource_ref: String,

    /// Optional override of the process-default inference provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inference_provider: Option<String>,

    /// Optional model override for the inference provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Optional embedding provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding_provider: Option<String>,

    /// Optional reranker provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reranker_provider: Option<String>,

    /// Optional vision provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vision_provider: Option<String>,

    /// Adapter kind tag (e.g. `passthrough`, `retrieval`, `intent-sql`),
    /// consumed only by pipeline code and opaque to the core
    #[serde(default = "default_kind", rename = "type")]
    pub kind: String,

    /// Free-form nested mapping of adapter-specific options
    #[serde(default = "empty_config")]
    pub config: Value,
}

fn default_enabled() -> bool {
    true
}

fn default_datasource() -> String {
    // HTTP placeholder: adapters that manage their own clients still
    // satisfy the registry pattern through it
    "http".to_string()
}

fn default_kind() -> String {
    "passthrough".to_string()
}

fn empty_config() -> Value {
    Value::Object(serde_json::Map::new())
}

impl AdapterDescriptor {
    /// Parse a descriptor from one element of the `adapters:` list
    pub fn from_value(value: &Value) -> Result<Self> {
        let descriptor: AdapterDescriptor = serde_json::from_value(value.clone())
            .map_err(|e| Error::config_with_source("invalid adapter entry", e))?;
        descriptor.validate()?;
        Ok(descriptor)
    }

    /// Validate structural invariants
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::config("adapter name must be non-empty"));
        }
        if !self.config.is_object() {
            return Err(Error::config(format!(
                "adapter '{}': config must be a mapping",
                self.name
            )));
        }
        Ok(())
    }

    /// Read a nested config value by dotted path
    pub fn config_value(&self, path: &str) -> Option<&Value> {
        let mut current = &self.config;
        for segment in path.split('.') {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }
}

/// Lifecycle state of a materialized adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdapterState {
    /// Fully resolved and serving requests
    Active,
    /// Present in the catalog but with no resources attached
    Disabled,
    /// Being removed; no longer served, resources pending release
    Draining,
}

impl std::fmt::Display for AdapterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Disabled => write!(f, "disabled"),
            Self::Draining => write!(f, "draining"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_minimal_entry() {
        let descriptor =
            AdapterDescriptor::from_value(&json!({"name": "simple-chat", "enabled": true}))
                .unwrap();
        assert_eq!(descriptor.name, "simple-chat");
        assert!(descriptor.enabled);
        assert_eq!(descriptor.datasource_ref, "http");
        assert_eq!(descriptor.kind, "passthrough");
        assert!(descriptor.config.as_object().unwrap().is_empty());
    }

    #[test]
    fn parses_full_entry() {
        let descriptor = AdapterDescriptor::from_value(&json!({
            "name": "intent-sql",
            "enabled": true,
            "type": "intent-sql",
            "datasource": "postgres",
            "inference_provider": "cohere",
            "model": "command-r-plus",
            "embedding_provider": "openai",
            "config": {"confidence_threshold": 0.3, "timezone": "America/New_York"}
        }))
        .unwrap();
        assert_eq!(descriptor.kind, "intent-sql");
        assert_eq!(descriptor.datasource_ref, "postgres");
        assert_eq!(
            descriptor.config_value("confidence_threshold"),
            Some(&json!(0.3))
        );
        assert_eq!(descriptor.config_value("missing"), None);
    }

    #[test]
    fn rejects_empty_name() {
        let err = AdapterDescriptor::from_value(&json!({"name": "  "})).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn round_trips_through_serde() {
        let original = AdapterDescriptor::from_value(&json!({
            "name": "qa",
            "enabled": false,
            "datasource_ref": "elasticsearch",
            "model": "command-r",
            "config": {"limit": 5}
        }))
        .unwrap();
        let serialized = serde_json::to_value(&original).unwrap();
        let reparsed = AdapterDescriptor::from_value(&serialized).unwrap();
        assert_eq!(original, reparsed);
    }
}
