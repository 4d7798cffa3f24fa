//! Datasource implementations
//!
//! Each backend registers itself in the datasource registry by name.
//! When a backend's cargo feature is disabled, a stub entry keeps the
//! name registered and fails `DependencyMissing` at construction, so a
//! deployment missing the library degrades instead of crashing.

pub mod http;
pub mod memory;

#[cfg(feature = "datasource-chroma")]
pub mod chroma;
#[cfg(feature = "datasource-elasticsearch")]
pub mod elasticsearch;
#[cfg(feature = "datasource-postgres")]
pub mod postgres;
#[cfg(feature = "datasource-qdrant")]
pub mod qdrant;
#[cfg(feature = "datasource-redis")]
pub mod redis;

pub use http::HttpDatasource;
pub use memory::MemoryDatasource;

// ============================================================================
// DependencyMissing stubs for feature-disabled backends
// ============================================================================

#[cfg(not(feature = "datasource-postgres"))]
mod postgres_stub {
    use orbit_application::ports::registry::{DatasourceEntry, DatasourceSettings, DATASOURCES};
    use orbit_domain::error::{Error, Result};
    use orbit_domain::ports::Datasource;
    use std::sync::Arc;

    fn factory(_settings: &DatasourceSettings) -> Result<Arc<dyn Datasource>> {
        Err(Error::dependency_missing(
            "postgres",
            "built without the 'datasource-postgres' feature",
        ))
    }

    #[linkme::distributed_slice(DATASOURCES)]
    static POSTGRES_STUB: DatasourceEntry = DatasourceEntry {
        name: "postgres",
        description: "PostgreSQL relational datasource (unavailable in this build)",
        factory,
    };
}

#[cfg(not(feature = "datasource-redis"))]
mod redis_stub {
    use orbit_application::ports::registry::{DatasourceEntry, DatasourceSettings, DATASOURCES};
    use orbit_domain::error::{Error, Result};
    use orbit_domain::ports::Datasource;
    use std::sync::Arc;

    fn factory(_settings: &DatasourceSettings) -> Result<Arc<dyn Datasource>> {
        Err(Error::dependency_missing(
            "redis",
            "built without the 'datasource-redis' feature",
        ))
    }

    #[linkme::distributed_slice(DATASOURCES)]
    static REDIS_STUB: DatasourceEntry = DatasourceEntry {
        name: "redis",
        description: "Redis key-value datasource (unavailable in this build)",
        factory,
    };
}
