//! Qdrant vector datasource (REST API)

use std::any::Any;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use orbit_application::ports::registry::{DatasourceEntry, DatasourceSettings, DATASOURCES};
use orbit_domain::error::{Error, Result};
use orbit_domain::ports::Datasource;

use crate::constants::{DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_QDRANT_URL};

/// Qdrant vector store datasource
pub struct QdrantDatasource {
    url: String,
    api_key: Option<String>,
    timeout: Duration,
    client: Mutex<Option<reqwest::Client>>,
}

impl QdrantDatasource {
    /// Build an unconnected instance from the `datasources.qdrant`
    /// config section
    pub fn from_settings(settings: &DatasourceSettings) -> Self {
        Self {
            url: settings
                .option_str("url")
                .unwrap_or(DEFAULT_QDRANT_URL)
                .trim_end_matches('/')
                .to_string(),
            api_key: settings.option_str("api_key").map(str::to_string),
            timeout: Duration::from_secs(
                settings
                    .option_u64("timeout")
                    .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS),
            ),
            client: Mutex::new(None),
        }
    }

    fn current_client(&self) -> Option<reqwest::Client> {
        self.client.lock().expect("qdrant lock poisoned").clone()
    }

    fn request(&self, client: &reqwest::Client, path: &str) -> reqwest::RequestBuilder {
        let mut builder = client.get(format!("{}{}", self.url, path));
        if let Some(key) = &self.api_key {
            builder = builder.header("api-key", key);
        }
        builder
    }
}

#[async_trait]
impl Datasource for QdrantDatasource {
    fn name(&self) -> &'static str {
        "qdrant"
    }

    async fn initialize(&self) -> Result<()> {
        if self.current_client().is_some() {
            debug!("qdrant datasource already initialized");
            return Ok(());
        }

        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| Error::config_with_source("qdrant: client build failed", e))?;

        let response = self
            .request(&client, "/collections")
            .send()
            .await
            .map_err(|e| Error::connection_failed_with_source("qdrant: dial failed", e))?;
        crate::utils::HttpResponseUtils::check_and_parse(response, "Qdrant").await?;

        info!("Connected to Qdrant at {}", self.url);
        *self.client.lock().expect("qdrant lock poisoned") = Some(client);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let Some(client) = self.current_client() else {
            return false;
        };
        match self.request(&client, "/healthz").send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    async fn close(&self) {
        if self.client.lock().expect("qdrant lock poisoned").take().is_some() {
            info!("Qdrant datasource connection closed");
        }
    }

    fn cache_key(&self) -> String {
        format!("qdrant:{}", self.url)
    }

    fn client(&self) -> Option<Arc<dyn Any + Send + Sync>> {
        self.current_client()
            .map(|client| Arc::new(client) as Arc<dyn Any + Send + Sync>)
    }
}

fn qdrant_factory(settings: &DatasourceSettings) -> Result<Arc<dyn Datasource>> {
    Ok(Arc::new(QdrantDatasource::from_settings(settings)))
}

#[linkme::distributed_slice(DATASOURCES)]
static QDRANT_DATASOURCE: DatasourceEntry = DatasourceEntry {
    name: "qdrant",
    description: "Qdrant vector store datasource (REST API)",
    factory: qdrant_factory,
};
