//! Infrastructure layer for the ORBIT control plane.
//!
//! Hosts the engines: the YAML config manager with import merging and a
//! TTL cache, the reference-counted datasource pool, the provider
//! factory with its keyed caches, the adapter manager with hot reload,
//! and the ambient logging/health plumbing.

// Linking the implementations is what populates the linkme registries
use orbit_providers as _;

pub mod config;
pub mod health;
pub mod logging;
pub mod manager;
pub mod providers;
pub mod registry;

pub use manager::AdapterManager;
pub use providers::ProviderFactory;
pub use registry::{DatasourceHandle, DatasourceRegistry};
