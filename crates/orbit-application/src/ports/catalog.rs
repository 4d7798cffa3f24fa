//! Readonly adapter query surface exposed to pipelines
//!
//! Pipelines and the request-context builder see the live catalog only
//! through this port, which keeps them decoupled from the reload
//! engine.

use orbit_domain::value_objects::AdapterState;
use serde_json::Value;

/// Readonly view over the live adapter catalog
pub trait AdapterQuery: Send + Sync {
    /// Current state of the named adapter, `None` when unknown
    fn adapter_state(&self, name: &str) -> Option<AdapterState>;

    /// The adapter's merged `config` sub-tree, or an empty map when the
    /// adapter is unknown
    fn adapter_config(&self, name: &str) -> Value;

    /// The adapter's inference provider override, when set
    fn inference_provider(&self, name: &str) -> Option<String>;

    /// The adapter's configured timezone, when set
    fn timezone(&self, name: &str) -> Option<String>;
}
