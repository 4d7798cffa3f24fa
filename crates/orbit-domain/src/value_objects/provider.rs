//! Provider kinds and cache keys

use serde::{Deserialize, Serialize};

/// The four provider kinds the factory can construct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Chat/completion inference backend
    Inference,
    /// Embedding backend
    Embedding,
    /// Rerank backend
    Reranker,
    /// Vision backend
    Vision,
}

impl ProviderKind {
    /// Root config section holding this kind's provider definitions
    pub fn config_section(&self) -> &'static str {
        match self {
            Self::Inference => "inference",
            Self::Embedding => "embedding",
            Self::Reranker => "reranker",
            Self::Vision => "vision",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.config_section())
    }
}

/// Cache key for provider handles: `(kind, provider_name, model_override)`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProviderKey {
    /// Provider kind
    pub kind: ProviderKind,
    /// Provider name as configured (e.g. `cohere`, `ollama`)
    pub name: String,
    /// Model override, when the adapter pins one
    pub model: Option<String>,
}

impl ProviderKey {
    /// Create a key for the given kind, name, and optional model override
    pub fn new(kind: ProviderKind, name: impl Into<String>, model: Option<&str>) -> Self {
        Self {
            kind,
            name: name.into(),
            model: model.map(str::to_string),
        }
    }
}

impl std::fmt::Display for ProviderKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.kind,
            self.name,
            self.model.as_deref().unwrap_or("∅")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_with_different_models_are_distinct() {
        let a = ProviderKey::new(ProviderKind::Inference, "cohere", Some("command-r-plus"));
        let b = ProviderKey::new(ProviderKind::Inference, "cohere", Some("command-r"));
        let c = ProviderKey::new(ProviderKind::Inference, "cohere", None);
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(c.to_string(), "inference:cohere:∅");
    }
}
