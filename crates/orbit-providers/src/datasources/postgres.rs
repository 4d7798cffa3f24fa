//! PostgreSQL datasource
//!
//! Pools connections with r2d2; the blocking pool construction and
//! probes run on the blocking thread pool so the async runtime never
//! stalls.

use std::any::Any;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use r2d2_postgres::postgres::NoTls;
use r2d2_postgres::PostgresConnectionManager;
use tracing::{debug, info};

use orbit_application::ports::registry::{DatasourceEntry, DatasourceSettings, DATASOURCES};
use orbit_domain::error::{Error, Result};
use orbit_domain::ports::Datasource;

type PgPool = r2d2::Pool<PostgresConnectionManager<NoTls>>;

/// PostgreSQL relational datasource
#[derive(Debug)]
pub struct PostgresDatasource {
    host: String,
    port: u16,
    database: String,
    username: String,
    password: String,
    pool_size: u32,
    pool: Mutex<Option<PgPool>>,
}

impl PostgresDatasource {
    /// Build an unconnected instance from the `datasources.postgres`
    /// config section
    pub fn from_settings(settings: &DatasourceSettings) -> Result<Self> {
        let port = settings.option_u64("port").unwrap_or(5432);
        let port = u16::try_from(port)
            .map_err(|_| Error::config(format!("postgres: invalid port {port}")))?;

        Ok(Self {
            host: settings.option_str("host").unwrap_or("localhost").to_string(),
            port,
            database: settings
                .option_str("database")
                .unwrap_or("postgres")
                .to_string(),
            username: settings
                .option_str("username")
                .unwrap_or("postgres")
                .to_string(),
            password: settings.option_str("password").unwrap_or("").to_string(),
            pool_size: settings.option_u64("pool_size").unwrap_or(4) as u32,
            pool: Mutex::new(None),
        })
    }

    fn connection_config(&self) -> String {
        format!(
            "host={} port={} dbname={} user={} password={}",
            self.host, self.port, self.database, self.username, self.password
        )
    }

    fn current_pool(&self) -> Option<PgPool> {
        self.pool.lock().expect("postgres pool lock poisoned").clone()
    }
}

#[async_trait]
impl Datasource for PostgresDatasource {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn initialize(&self) -> Result<()> {
        if self.current_pool().is_some() {
            debug!("postgres datasource already initialized");
            return Ok(());
        }

        let config = self
            .connection_config()
            .parse::<r2d2_postgres::postgres::Config>()
            .map_err(|e| Error::config_with_source("postgres: invalid connection config", e))?;
        let pool_size = self.pool_size;

        info!(
            "Initializing PostgreSQL connection to {}:{}/{}",
            self.host, self.port, self.database
        );

        let pool = tokio::task::spawn_blocking(move || {
            let manager = PostgresConnectionManager::new(config, NoTls);
            r2d2::Pool::builder()
                .max_size(pool_size)
                .connection_timeout(std::time::Duration::from_secs(10))
                .build(manager)
        })
        .await
        .map_err(|e| Error::internal(format!("postgres init task panicked: {e}")))?
        .map_err(|e| Error::connection_failed_with_source("postgres: dial failed", e))?;

        *self.pool.lock().expect("postgres pool lock poisoned") = Some(pool);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let Some(pool) = self.current_pool() else {
            return false;
        };
        tokio::task::spawn_blocking(move || {
            pool.get()
                .ok()
                .and_then(|mut conn| conn.simple_query("SELECT 1").ok())
                .is_some()
        })
        .await
        .unwrap_or(false)
    }

    async fn close(&self) {
        let pool = self.pool.lock().expect("postgres pool lock poisoned").take();
        if let Some(pool) = pool {
            // Dropping the pool closes its connections; do it off the
            // async runtime
            let _ = tokio::task::spawn_blocking(move || drop(pool)).await;
            info!("PostgreSQL connection pool closed");
        }
    }

    fn cache_key(&self) -> String {
        format!(
            "postgres:{}:{}/{}:{}",
            self.host, self.port, self.database, self.username
        )
    }

    fn client(&self) -> Option<Arc<dyn Any + Send + Sync>> {
        self.current_pool()
            .map(|pool| Arc::new(pool) as Arc<dyn Any + Send + Sync>)
    }
}

fn postgres_factory(settings: &DatasourceSettings) -> Result<Arc<dyn Datasource>> {
    Ok(Arc::new(PostgresDatasource::from_settings(settings)?))
}

#[linkme::distributed_slice(DATASOURCES)]
static POSTGRES_DATASOURCE: DatasourceEntry = DatasourceEntry {
    name: "postgres",
    description: "PostgreSQL relational datasource (r2d2 connection pool)",
    factory: postgres_factory,
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cache_key_covers_connection_identity() {
        let settings = DatasourceSettings::new("postgres").with_options(json!({
            "host": "db.internal",
            "port": 5433,
            "database": "orbit",
            "username": "svc"
        }));
        let ds = PostgresDatasource::from_settings(&settings).unwrap();
        assert_eq!(ds.cache_key(), "postgres:db.internal:5433/orbit:svc");
    }

    #[test]
    fn invalid_port_is_a_config_error() {
        let settings =
            DatasourceSettings::new("postgres").with_options(json!({"port": 70000}));
        let err = PostgresDatasource::from_settings(&settings).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[tokio::test]
    async fn health_check_is_false_before_initialize() {
        let settings = DatasourceSettings::new("postgres").with_options(json!({}));
        let ds = PostgresDatasource::from_settings(&settings).unwrap();
        assert!(!ds.health_check().await);
        assert!(ds.client().is_none());
    }
}
