//! Error handling types

use thiserror::Error;

use crate::value_objects::ProviderKind;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the ORBIT control plane
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error: missing file, parse failure, duplicate
    /// adapter name, failed validation
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Request named an adapter that is not in the live catalog
    #[error("Unknown adapter '{name}'")]
    UnknownAdapter {
        /// The adapter name that failed to resolve
        name: String,
    },

    /// Request named an adapter that exists but is disabled
    #[error("Adapter '{name}' is disabled")]
    AdapterDisabled {
        /// The disabled adapter name
        name: String,
    },

    /// A provider referenced by an adapter has no configuration section
    #[error("{kind} provider '{name}' is not configured")]
    NotConfigured {
        /// Provider kind that failed to resolve
        kind: ProviderKind,
        /// Provider name that failed to resolve
        name: String,
    },

    /// A provider is configured but marked `enabled: false`
    #[error("{kind} provider '{name}' is disabled")]
    ProviderDisabled {
        /// Provider kind
        kind: ProviderKind,
        /// Provider name
        name: String,
    },

    /// A datasource implementation requires a backend library that is
    /// not available in this build or deployment
    #[error("Datasource '{name}' dependency missing: {message}")]
    DependencyMissing {
        /// Datasource name
        name: String,
        /// What is missing
        message: String,
    },

    /// Dial-time network or authentication failure against a backend
    #[error("Connection failed: {message}")]
    ConnectionFailed {
        /// Description of the connection failure
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Post-initialization liveness probe failed
    #[error("Health check failed for '{name}'")]
    HealthFailed {
        /// Name of the component that failed its probe
        name: String,
    },

    /// A single adapter's reload failed; the batch continues
    #[error("Reload failed for adapter '{adapter}': {message}")]
    ReloadFailed {
        /// Adapter whose reload failed
        adapter: String,
        /// Root cause description
        message: String,
    },

    /// Resource not found error
    #[error("Not found: {resource}")]
    NotFound {
        /// The resource that was not found
        resource: String,
    },

    /// Datasource operation error
    #[error("Datasource error: {message}")]
    Datasource {
        /// Description of the datasource error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Provider operation error
    #[error("Provider error: {message}")]
    Provider {
        /// Description of the provider error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O operation error
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error
        #[from]
        source: std::io::Error,
    },

    /// JSON parsing or serialization error
    #[error("JSON error: {source}")]
    Json {
        /// The underlying JSON error
        #[from]
        source: serde_json::Error,
    },

    /// Internal system error - programmer error, never swallowed
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },
}

// Configuration error creation methods
impl Error {
    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn config_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Lookup error creation methods
impl Error {
    /// Create an unknown adapter error
    pub fn unknown_adapter<S: Into<String>>(name: S) -> Self {
        Self::UnknownAdapter { name: name.into() }
    }

    /// Create an adapter disabled error
    pub fn adapter_disabled<S: Into<String>>(name: S) -> Self {
        Self::AdapterDisabled { name: name.into() }
    }

    /// Create a not found error
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }
}

// Provider error creation methods
impl Error {
    /// Create a not configured error
    pub fn not_configured<S: Into<String>>(kind: ProviderKind, name: S) -> Self {
        Self::NotConfigured {
            kind,
            name: name.into(),
        }
    }

    /// Create a provider disabled error
    pub fn provider_disabled<S: Into<String>>(kind: ProviderKind, name: S) -> Self {
        Self::ProviderDisabled {
            kind,
            name: name.into(),
        }
    }

    /// Create a provider error
    pub fn provider<S: Into<String>>(message: S) -> Self {
        Self::Provider {
            message: message.into(),
            source: None,
        }
    }

    /// Create a provider error with source
    pub fn provider_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Provider {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Datasource error creation methods
impl Error {
    /// Create a dependency missing error
    pub fn dependency_missing<S: Into<String>, M: Into<String>>(name: S, message: M) -> Self {
        Self::DependencyMissing {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a connection failed error
    pub fn connection_failed<S: Into<String>>(message: S) -> Self {
        Self::ConnectionFailed {
            message: message.into(),
            source: None,
        }
    }

    /// Create a connection failed error with source
    pub fn connection_failed_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::ConnectionFailed {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a health failed error
    pub fn health_failed<S: Into<String>>(name: S) -> Self {
        Self::HealthFailed { name: name.into() }
    }

    /// Create a datasource error
    pub fn datasource<S: Into<String>>(message: S) -> Self {
        Self::Datasource {
            message: message.into(),
            source: None,
        }
    }

    /// Create a datasource error with source
    pub fn datasource_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Datasource {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Reload and internal error creation methods
impl Error {
    /// Create a reload failed error
    pub fn reload_failed<A: Into<String>, M: Into<String>>(adapter: A, message: M) -> Self {
        Self::ReloadFailed {
            adapter: adapter.into(),
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
