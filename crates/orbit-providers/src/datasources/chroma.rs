//! Chroma vector datasource (REST API)

use std::any::Any;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use orbit_application::ports::registry::{DatasourceEntry, DatasourceSettings, DATASOURCES};
use orbit_domain::error::{Error, Result};
use orbit_domain::ports::Datasource;

use crate::constants::{DEFAULT_CHROMA_HOST, DEFAULT_CHROMA_PORT, DEFAULT_HTTP_TIMEOUT_SECS};

/// Chroma vector store datasource
pub struct ChromaDatasource {
    host: String,
    port: u16,
    timeout: Duration,
    client: Mutex<Option<reqwest::Client>>,
}

impl ChromaDatasource {
    /// Build an unconnected instance from the `datasources.chroma`
    /// config section
    pub fn from_settings(settings: &DatasourceSettings) -> Result<Self> {
        let port = settings
            .option_u64("port")
            .unwrap_or(u64::from(DEFAULT_CHROMA_PORT));
        let port = u16::try_from(port)
            .map_err(|_| Error::config(format!("chroma: invalid port {port}")))?;
        Ok(Self {
            host: settings
                .option_str("host")
                .unwrap_or(DEFAULT_CHROMA_HOST)
                .to_string(),
            port,
            timeout: Duration::from_secs(
                settings
                    .option_u64("timeout")
                    .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS),
            ),
            client: Mutex::new(None),
        })
    }

    fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    fn current_client(&self) -> Option<reqwest::Client> {
        self.client.lock().expect("chroma lock poisoned").clone()
    }
}

#[async_trait]
impl Datasource for ChromaDatasource {
    fn name(&self) -> &'static str {
        "chroma"
    }

    async fn initialize(&self) -> Result<()> {
        if self.current_client().is_some() {
            debug!("chroma datasource already initialized");
            return Ok(());
        }

        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| Error::config_with_source("chroma: client build failed", e))?;

        let response = client
            .get(format!("{}/api/v1/heartbeat", self.base_url()))
            .send()
            .await
            .map_err(|e| Error::connection_failed_with_source("chroma: dial failed", e))?;
        crate::utils::HttpResponseUtils::check_and_parse(response, "Chroma").await?;

        info!("Connected to Chroma at {}", self.base_url());
        *self.client.lock().expect("chroma lock poisoned") = Some(client);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let Some(client) = self.current_client() else {
            return false;
        };
        match client
            .get(format!("{}/api/v1/heartbeat", self.base_url()))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    async fn close(&self) {
        if self.client.lock().expect("chroma lock poisoned").take().is_some() {
            info!("Chroma datasource connection closed");
        }
    }

    fn cache_key(&self) -> String {
        format!("chroma:{}:{}", self.host, self.port)
    }

    fn client(&self) -> Option<Arc<dyn Any + Send + Sync>> {
        self.current_client()
            .map(|client| Arc::new(client) as Arc<dyn Any + Send + Sync>)
    }
}

fn chroma_factory(settings: &DatasourceSettings) -> Result<Arc<dyn Datasource>> {
    Ok(Arc::new(ChromaDatasource::from_settings(settings)?))
}

#[linkme::distributed_slice(DATASOURCES)]
static CHROMA_DATASOURCE: DatasourceEntry = DatasourceEntry {
    name: "chroma",
    description: "Chroma vector store datasource (REST API)",
    factory: chroma_factory,
};
