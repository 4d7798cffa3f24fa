//! Datasource port
//!
//! The uniform async lifecycle every backend integration implements.
//! Instances are pooled by the registry: two instances whose `cache_key`
//! matches are interchangeable and share one live connection.

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

/// Uniform lifecycle over heterogeneous storage backends
#[async_trait]
pub trait Datasource: Send + Sync {
    /// Stable tag used for registry discovery (`postgres`, `redis`,
    /// `elasticsearch`, ...)
    fn name(&self) -> &'static str;

    /// Establish the backend connection.
    ///
    /// Idempotent: calling on an already-initialized instance is a
    /// no-op. Failures distinguish invalid configuration, dial-time
    /// connection errors, missing backend libraries, and failed
    /// post-init probes through the error taxonomy.
    async fn initialize(&self) -> Result<()>;

    /// Cheap liveness probe. Never propagates errors to the caller;
    /// returns `false` on any failure.
    async fn health_check(&self) -> bool;

    /// Release all resources. The handle must not be reused afterwards.
    async fn close(&self);

    /// Deterministic key over the configuration fields that make two
    /// instances interchangeable (e.g. `elasticsearch:<node>:<user>`)
    fn cache_key(&self) -> String;

    /// The vendor-specific client handle. Callers downcast by knowledge
    /// of `name()`. `None` for placeholder datasources with no central
    /// client.
    fn client(&self) -> Option<Arc<dyn Any + Send + Sync>>;
}
