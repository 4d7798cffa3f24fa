//! Redis datasource
//!
//! Wraps a `ConnectionManager`, which multiplexes and reconnects on its
//! own; the pool shares one manager per URL.

use std::any::Any;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use tracing::{debug, info};

use orbit_application::ports::registry::{DatasourceEntry, DatasourceSettings, DATASOURCES};
use orbit_domain::error::{Error, Result};
use orbit_domain::ports::Datasource;

/// Redis key-value datasource
pub struct RedisDatasource {
    url: String,
    manager: Mutex<Option<ConnectionManager>>,
}

impl RedisDatasource {
    /// Build an unconnected instance from the `datasources.redis`
    /// config section
    pub fn from_settings(settings: &DatasourceSettings) -> Self {
        let url = settings
            .option_str("url")
            .map(str::to_string)
            .unwrap_or_else(|| {
                let host = settings.option_str("host").unwrap_or("localhost");
                let port = settings.option_u64("port").unwrap_or(6379);
                format!("redis://{host}:{port}")
            });
        Self {
            url,
            manager: Mutex::new(None),
        }
    }

    fn current_manager(&self) -> Option<ConnectionManager> {
        self.manager.lock().expect("redis manager lock poisoned").clone()
    }
}

#[async_trait]
impl Datasource for RedisDatasource {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn initialize(&self) -> Result<()> {
        if self.current_manager().is_some() {
            debug!("redis datasource already initialized");
            return Ok(());
        }

        let client = redis::Client::open(self.url.as_str())
            .map_err(|e| Error::config_with_source("redis: invalid connection URL", e))?;
        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| Error::connection_failed_with_source("redis: dial failed", e))?;

        info!("Connected to Redis at {}", self.url);
        *self.manager.lock().expect("redis manager lock poisoned") = Some(manager);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let Some(mut manager) = self.current_manager() else {
            return false;
        };
        let pong: std::result::Result<String, _> =
            redis::cmd("PING").query_async(&mut manager).await;
        matches!(pong.as_deref(), Ok("PONG"))
    }

    async fn close(&self) {
        // The manager's connections close on drop
        let dropped = self
            .manager
            .lock()
            .expect("redis manager lock poisoned")
            .take();
        if dropped.is_some() {
            info!("Redis connection closed");
        }
    }

    fn cache_key(&self) -> String {
        format!("redis:{}", self.url)
    }

    fn client(&self) -> Option<Arc<dyn Any + Send + Sync>> {
        self.current_manager()
            .map(|manager| Arc::new(manager) as Arc<dyn Any + Send + Sync>)
    }
}

fn redis_factory(settings: &DatasourceSettings) -> Result<Arc<dyn Datasource>> {
    Ok(Arc::new(RedisDatasource::from_settings(settings)))
}

#[linkme::distributed_slice(DATASOURCES)]
static REDIS_DATASOURCE: DatasourceEntry = DatasourceEntry {
    name: "redis",
    description: "Redis key-value datasource (multiplexed connection manager)",
    factory: redis_factory,
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn url_option_wins_over_host_and_port() {
        let settings = DatasourceSettings::new("redis").with_options(json!({
            "url": "redis://cache.internal:6380",
            "host": "ignored"
        }));
        let ds = RedisDatasource::from_settings(&settings);
        assert_eq!(ds.cache_key(), "redis:redis://cache.internal:6380");
    }

    #[test]
    fn host_and_port_compose_a_default_url() {
        let settings =
            DatasourceSettings::new("redis").with_options(json!({"host": "cache", "port": 6380}));
        let ds = RedisDatasource::from_settings(&settings);
        assert_eq!(ds.cache_key(), "redis:redis://cache:6380");
    }
}
