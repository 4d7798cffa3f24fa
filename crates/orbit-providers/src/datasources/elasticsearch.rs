//! Elasticsearch datasource
//!
//! Talks to the cluster over its JSON REST API. Compatible with
//! Elasticsearch 8/9 and OpenSearch.

use std::any::Any;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use orbit_application::ports::registry::{DatasourceEntry, DatasourceSettings, DATASOURCES};
use orbit_domain::error::{Error, Result};
use orbit_domain::ports::Datasource;

use crate::constants::{DEFAULT_ELASTICSEARCH_NODE, DEFAULT_HTTP_TIMEOUT_SECS};

/// Elasticsearch search datasource
#[derive(Debug)]
pub struct ElasticsearchDatasource {
    node: String,
    username: String,
    password: String,
    verify_certs: bool,
    timeout: Duration,
    client: Mutex<Option<reqwest::Client>>,
}

impl ElasticsearchDatasource {
    /// Build an unconnected instance from the
    /// `datasources.elasticsearch` config section
    pub fn from_settings(settings: &DatasourceSettings) -> Result<Self> {
        let auth = settings.options.get("auth").cloned().unwrap_or_default();
        let username = auth
            .get("username")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("")
            .to_string();
        let password = auth
            .get("password")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("")
            .to_string();

        // A username without a password (or vice versa) is a broken
        // credential pair, not an anonymous connection
        if username.is_empty() != password.is_empty() {
            return Err(Error::config(
                "elasticsearch: auth requires both username and password",
            ));
        }

        Ok(Self {
            node: settings
                .option_str("node")
                .unwrap_or(DEFAULT_ELASTICSEARCH_NODE)
                .trim_end_matches('/')
                .to_string(),
            username,
            password,
            verify_certs: settings
                .options
                .get("verify_certs")
                .and_then(serde_json::Value::as_bool)
                .unwrap_or(true),
            timeout: Duration::from_secs(
                settings
                    .option_u64("timeout")
                    .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS),
            ),
            client: Mutex::new(None),
        })
    }

    fn current_client(&self) -> Option<reqwest::Client> {
        self.client.lock().expect("elasticsearch lock poisoned").clone()
    }

    fn request(&self, client: &reqwest::Client, path: &str) -> reqwest::RequestBuilder {
        let mut builder = client.get(format!("{}{}", self.node, path));
        if !self.username.is_empty() {
            builder = builder.basic_auth(&self.username, Some(&self.password));
        }
        builder
    }
}

#[async_trait]
impl Datasource for ElasticsearchDatasource {
    fn name(&self) -> &'static str {
        "elasticsearch"
    }

    async fn initialize(&self) -> Result<()> {
        if self.current_client().is_some() {
            debug!("elasticsearch datasource already initialized");
            return Ok(());
        }

        if !self.verify_certs {
            warn!("Elasticsearch: SSL certificate verification disabled");
        }

        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .danger_accept_invalid_certs(!self.verify_certs)
            .build()
            .map_err(|e| Error::config_with_source("elasticsearch: client build failed", e))?;

        let info = self
            .request(&client, "/")
            .send()
            .await
            .map_err(|e| Error::connection_failed_with_source("elasticsearch: dial failed", e))?;
        let info = crate::utils::HttpResponseUtils::check_and_parse(info, "Elasticsearch").await?;

        info!(
            "Connected to Elasticsearch cluster: {} (version: {})",
            info.get("cluster_name")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("unknown"),
            info.pointer("/version/number")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("unknown")
        );

        *self.client.lock().expect("elasticsearch lock poisoned") = Some(client);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let Some(client) = self.current_client() else {
            return false;
        };
        match self.request(&client, "/_cluster/health").send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    async fn close(&self) {
        if self
            .client
            .lock()
            .expect("elasticsearch lock poisoned")
            .take()
            .is_some()
        {
            info!("Elasticsearch datasource connection closed");
        }
    }

    fn cache_key(&self) -> String {
        // Node URL plus user keeps different clusters and identities on
        // separate connections
        let username = if self.username.is_empty() {
            "anonymous"
        } else {
            &self.username
        };
        format!("elasticsearch:{}:{}", self.node, username)
    }

    fn client(&self) -> Option<Arc<dyn Any + Send + Sync>> {
        self.current_client()
            .map(|client| Arc::new(client) as Arc<dyn Any + Send + Sync>)
    }
}

fn elasticsearch_factory(settings: &DatasourceSettings) -> Result<Arc<dyn Datasource>> {
    Ok(Arc::new(ElasticsearchDatasource::from_settings(settings)?))
}

#[linkme::distributed_slice(DATASOURCES)]
static ELASTICSEARCH_DATASOURCE: DatasourceEntry = DatasourceEntry {
    name: "elasticsearch",
    description: "Elasticsearch search datasource (REST API)",
    factory: elasticsearch_factory,
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cache_key_includes_node_and_user() {
        let settings = DatasourceSettings::new("elasticsearch").with_options(json!({
            "node": "https://es.internal:9200/",
            "auth": {"username": "svc", "password": "secret"}
        }));
        let ds = ElasticsearchDatasource::from_settings(&settings).unwrap();
        assert_eq!(ds.cache_key(), "elasticsearch:https://es.internal:9200:svc");
    }

    #[test]
    fn anonymous_cache_key_when_no_credentials() {
        let settings = DatasourceSettings::new("elasticsearch").with_options(json!({}));
        let ds = ElasticsearchDatasource::from_settings(&settings).unwrap();
        assert_eq!(
            ds.cache_key(),
            "elasticsearch:http://localhost:9200:anonymous"
        );
    }

    #[test]
    fn inconsistent_credential_pair_is_rejected() {
        let settings = DatasourceSettings::new("elasticsearch")
            .with_options(json!({"auth": {"username": "svc"}}));
        let err = ElasticsearchDatasource::from_settings(&settings).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }
}
