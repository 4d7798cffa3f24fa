//! Adapter manager hot-reload tests
//!
//! Drives the reload engine end to end over the memory datasource and
//! offline provider handles, asserting summary counts, the emitted
//! change/cleared fragments, cache-invalidation precision, and
//! datasource refcount behavior.

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use orbit_application::ports::AdapterQuery;
use orbit_application::use_cases::{ContextParams, RequestContextBuilder};
use orbit_domain::error::Error;
use orbit_domain::value_objects::{AdapterState, ProviderKey, ProviderKind, ReloadSummary};
use orbit_infrastructure::config::ConfigManager;
use orbit_infrastructure::{AdapterManager, DatasourceRegistry, ProviderFactory};

const ROOT_CONFIG: &str = r#"general:
  inference_provider: cohere
inference:
  cohere:
    model: command-r
  ollama:
    base_url: http://localhost:11434
  "null": {}
embedding:
  "null": {}
  openai: {}
reranker:
  "null": {}
vision:
  "null": {}
datasources:
  memory:
    namespace: shared
import: adapters.yaml
"#;

struct Fixture {
    dir: TempDir,
    registry: Arc<DatasourceRegistry>,
    factory: Arc<ProviderFactory>,
    manager: Arc<AdapterManager>,
}

impl Fixture {
    fn new(adapters_yaml: &str) -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.yaml"), ROOT_CONFIG).unwrap();
        fs::write(dir.path().join("adapters.yaml"), adapters_yaml).unwrap();

        let config = Arc::new(
            ConfigManager::new(dir.path().join("config.yaml")).with_ttl(Duration::ZERO),
        );
        let registry = Arc::new(DatasourceRegistry::new());
        let factory = Arc::new(ProviderFactory::new());
        let manager = Arc::new(AdapterManager::new(
            config,
            Arc::clone(&registry),
            Arc::clone(&factory),
        ));
        Self {
            dir,
            registry,
            factory,
            manager,
        }
    }

    fn set_adapters(&self, yaml: &str) {
        fs::write(self.dir.path().join("adapters.yaml"), yaml).unwrap();
    }

    async fn load_all(&self) -> ReloadSummary {
        self.manager
            .load_all(&CancellationToken::new())
            .await
            .unwrap()
    }

    async fn reload(&self, name: Option<&str>) -> ReloadSummary {
        self.manager
            .reload(name, &CancellationToken::new())
            .await
            .unwrap()
    }
}

const SIMPLE_CHAT: &str = r#"adapters:
  - name: simple-chat
    enabled: true
    type: passthrough
    datasource: memory
    inference_provider: cohere
    model: command-r-plus
    embedding_provider: "null"
    config:
      confidence_threshold: 0.3
"#;

#[tokio::test]
async fn initial_load_materializes_and_preloads() {
    let fixture = Fixture::new(SIMPLE_CHAT);
    let summary = fixture.load_all().await;

    assert_eq!(summary.added, 1);
    assert_eq!(summary.total, 1);
    assert_eq!(
        fixture.manager.adapter_state("simple-chat"),
        Some(AdapterState::Active)
    );
    assert!(fixture
        .factory
        .contains(&ProviderKey::new(ProviderKind::Inference, "cohere", Some("command-r-plus"))));
    assert_eq!(fixture.registry.refcount("memory:shared"), Some(1));
}

// Scenario: a nested-only change must not touch the provider cache
#[tokio::test]
async fn nested_only_change_keeps_provider_cache_identity() {
    let fixture = Fixture::new(SIMPLE_CHAT);
    fixture.load_all().await;

    let before = fixture
        .factory
        .peek_inference("cohere", Some("command-r-plus"))
        .unwrap();

    fixture.set_adapters(&SIMPLE_CHAT.replace("0.3", "0.5"));
    let summary = fixture.reload(Some("simple-chat")).await;

    assert_eq!(summary.updated, 1);
    let outcome = summary.outcome("simple-chat").unwrap();
    assert_eq!(
        outcome.changes,
        vec!["config.confidence_threshold: 0.3→0.5"]
    );
    assert!(outcome.cleared.is_empty());

    let after = fixture
        .factory
        .peek_inference("cohere", Some("command-r-plus"))
        .unwrap();
    assert!(Arc::ptr_eq(&before, &after));
    // No datasource churn either
    assert_eq!(fixture.registry.refcount("memory:shared"), Some(1));
}

// Scenario: a provider swap clears exactly the inference entry
#[tokio::test]
async fn provider_swap_clears_exactly_one_cache_entry() {
    let fixture = Fixture::new(SIMPLE_CHAT);
    fixture.load_all().await;

    fixture.set_adapters(&SIMPLE_CHAT.replace(
        "inference_provider: cohere",
        "inference_provider: ollama",
    ));
    let summary = fixture.reload(Some("simple-chat")).await;

    assert_eq!(summary.updated, 1);
    let outcome = summary.outcome("simple-chat").unwrap();
    assert!(outcome
        .changes
        .contains(&"inference_provider: cohere→ollama".to_string()));
    assert_eq!(outcome.cleared, vec!["provider:ollama"]);

    // Old entry evicted, new one created and initialized
    assert!(!fixture
        .factory
        .contains(&ProviderKey::new(ProviderKind::Inference, "cohere", Some("command-r-plus"))));
    assert!(fixture
        .factory
        .contains(&ProviderKey::new(ProviderKind::Inference, "ollama", Some("command-r-plus"))));
    // Embedding cache untouched
    assert!(fixture
        .factory
        .contains(&ProviderKey::new(ProviderKind::Embedding, "null", None)));
}

// Scenario: disable then enable preserves identity and re-preloads
#[tokio::test]
async fn disable_then_enable_preserves_identity() {
    let fixture = Fixture::new(SIMPLE_CHAT);
    fixture.load_all().await;

    fixture.set_adapters(&SIMPLE_CHAT.replace("enabled: true", "enabled: false"));
    let summary = fixture.reload(Some("simple-chat")).await;
    assert_eq!(summary.disabled, 1);
    let outcome = summary.outcome("simple-chat").unwrap();
    assert!(outcome.cleared.contains(&"provider:cohere".to_string()));
    assert!(outcome.cleared.contains(&"embedding:null".to_string()));

    // Resources released: provider cache and datasource pool drained
    assert!(!fixture
        .factory
        .contains(&ProviderKey::new(ProviderKind::Inference, "cohere", Some("command-r-plus"))));
    assert_eq!(fixture.registry.refcount("memory:shared"), None);

    // The name no longer serves requests, but the stub preserves it
    assert_eq!(
        fixture.manager.adapter_state("simple-chat"),
        Some(AdapterState::Disabled)
    );
    let catalog: Arc<dyn AdapterQuery> = fixture.manager.clone() as Arc<dyn AdapterQuery>;
    let builder = RequestContextBuilder::new(catalog, None, None);
    let err = builder
        .build(ContextParams {
            message: "hi".into(),
            adapter_name: "simple-chat".into(),
            ..Default::default()
        })
        .unwrap_err();
    assert!(matches!(err, Error::AdapterDisabled { .. }));

    // Re-enable: resources come back and requests resolve again
    fixture.set_adapters(SIMPLE_CHAT);
    let summary = fixture.reload(Some("simple-chat")).await;
    assert_eq!(summary.enabled, 1);
    assert_eq!(
        fixture.manager.adapter_state("simple-chat"),
        Some(AdapterState::Active)
    );
    assert!(fixture
        .factory
        .contains(&ProviderKey::new(ProviderKind::Inference, "cohere", Some("command-r-plus"))));
    assert_eq!(fixture.registry.refcount("memory:shared"), Some(1));

    let context = builder
        .build(ContextParams {
            message: "hi".into(),
            adapter_name: "simple-chat".into(),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(context.inference_provider.as_deref(), Some("cohere"));
}

const TWO_ADAPTERS: &str = r#"adapters:
  - name: alpha
    enabled: true
    datasource: memory
    inference_provider: "null"
  - name: beta
    enabled: true
    datasource: memory
    inference_provider: "null"
"#;

// Scenario: a shared datasource survives a single-adapter remove
#[tokio::test]
async fn shared_datasource_survives_single_adapter_remove() {
    let fixture = Fixture::new(TWO_ADAPTERS);
    let summary = fixture.load_all().await;
    assert_eq!(summary.added, 2);
    assert_eq!(fixture.registry.refcount("memory:shared"), Some(2));

    fixture.set_adapters(
        r#"adapters:
  - name: beta
    enabled: true
    datasource: memory
    inference_provider: "null"
"#,
    );
    let summary = fixture.reload(None).await;
    assert_eq!(summary.removed, 1);
    assert_eq!(summary.unchanged, 1);

    // Decremented, not closed
    assert_eq!(fixture.registry.refcount("memory:shared"), Some(1));
    assert!(fixture.manager.get("beta").is_ok());
    assert!(matches!(
        fixture.manager.get("alpha").unwrap_err(),
        Error::UnknownAdapter { .. }
    ));
    let health = fixture.registry.health_check_all().await;
    assert_eq!(health, vec![("memory:shared".to_string(), true)]);
}

// Scenario: reloading a name in neither catalog is NotFound
#[tokio::test]
async fn reload_of_missing_adapter_is_not_found() {
    let fixture = Fixture::new(SIMPLE_CHAT);
    fixture.load_all().await;

    let err = fixture
        .manager
        .reload(Some("nonexistent-adapter-12345"), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));

    // Catalog unchanged
    assert_eq!(fixture.manager.list().len(), 1);
    assert_eq!(
        fixture.manager.adapter_state("simple-chat"),
        Some(AdapterState::Active)
    );
}

// Scenario: rapid successive reloads converge without churn
#[tokio::test]
async fn rapid_successive_reloads_converge() {
    let fixture = Fixture::new(SIMPLE_CHAT);
    fixture.load_all().await;

    let before = fixture
        .factory
        .peek_inference("cohere", Some("command-r-plus"))
        .unwrap();

    for _ in 0..3 {
        let summary = fixture.reload(Some("simple-chat")).await;
        assert_eq!(summary.unchanged, 1);
        assert_eq!(summary.updated, 0);
        assert_eq!(summary.added, 0);
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    // No provider re-initialization, no datasource churn
    let after = fixture
        .factory
        .peek_inference("cohere", Some("command-r-plus"))
        .unwrap();
    assert!(Arc::ptr_eq(&before, &after));
    assert_eq!(fixture.registry.refcount("memory:shared"), Some(1));
}

#[tokio::test]
async fn reload_with_identical_input_is_idempotent() {
    let fixture = Fixture::new(SIMPLE_CHAT);
    fixture.load_all().await;

    fixture.set_adapters(&SIMPLE_CHAT.replace("0.3", "0.7"));
    let first = fixture.reload(None).await;
    assert_eq!(first.updated, 1);

    let second = fixture.reload(None).await;
    assert_eq!(second.updated, 0);
    assert_eq!(second.added, 0);
    assert_eq!(second.removed, 0);
    assert_eq!(second.unchanged, 1);
}

#[tokio::test]
async fn adding_a_disabled_adapter_records_a_stub_without_resources() {
    let fixture = Fixture::new(
        r#"adapters:
  - name: dormant
    enabled: false
    datasource: memory
    inference_provider: "null"
"#,
    );
    let summary = fixture.load_all().await;

    assert_eq!(summary.added, 1);
    assert_eq!(
        fixture.manager.adapter_state("dormant"),
        Some(AdapterState::Disabled)
    );
    // No resources acquired for the stub
    assert!(fixture.registry.is_empty());
    assert!(fixture.factory.is_empty(ProviderKind::Inference));
}

#[tokio::test]
async fn per_adapter_failure_is_isolated() {
    let fixture = Fixture::new(
        r#"adapters:
  - name: broken
    enabled: true
    datasource: no-such-backend
    inference_provider: "null"
  - name: healthy
    enabled: true
    datasource: memory
    inference_provider: "null"
"#,
    );
    let summary = fixture.load_all().await;

    assert_eq!(summary.failed, 1);
    assert_eq!(summary.added, 1);
    let outcome = summary.outcome("broken").unwrap();
    assert_eq!(outcome.action, "failed");
    assert!(outcome.error.as_deref().unwrap().contains("no-such-backend"));

    // The broken adapter was never inserted; the healthy one serves
    assert!(fixture.manager.get("broken").is_err());
    assert_eq!(
        fixture.manager.adapter_state("healthy"),
        Some(AdapterState::Active)
    );
}

#[tokio::test]
async fn catalog_parse_failure_aborts_and_keeps_state() {
    let fixture = Fixture::new(SIMPLE_CHAT);
    fixture.load_all().await;

    // Duplicate names are a hard catalog error
    fixture.set_adapters(
        r#"adapters:
  - name: simple-chat
  - name: simple-chat
"#,
    );
    let err = fixture
        .manager
        .reload(None, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("duplicate adapter name"));

    // Live state unchanged
    assert_eq!(
        fixture.manager.adapter_state("simple-chat"),
        Some(AdapterState::Active)
    );
    assert_eq!(fixture.registry.refcount("memory:shared"), Some(1));
}

#[tokio::test]
async fn datasource_ref_change_swaps_the_pooled_backend() {
    let fixture = Fixture::new(SIMPLE_CHAT);
    fixture.load_all().await;

    fixture.set_adapters(&SIMPLE_CHAT.replace("datasource: memory", "datasource: http"));
    let summary = fixture.reload(None).await;

    assert_eq!(summary.updated, 1);
    let outcome = summary.outcome("simple-chat").unwrap();
    assert!(outcome
        .changes
        .contains(&"datasource_ref: memory→http".to_string()));

    assert_eq!(fixture.registry.refcount("memory:shared"), None);
    assert_eq!(fixture.registry.refcount("http:placeholder"), Some(1));
    // Datasource swap alone does not clear provider caches
    assert!(fixture
        .factory
        .contains(&ProviderKey::new(ProviderKind::Inference, "cohere", Some("command-r-plus"))));
}

#[tokio::test]
async fn model_change_revalidates_the_inference_entry() {
    let fixture = Fixture::new(SIMPLE_CHAT);
    fixture.load_all().await;

    fixture.set_adapters(&SIMPLE_CHAT.replace("model: command-r-plus", "model: command-r"));
    let summary = fixture.reload(Some("simple-chat")).await;

    let outcome = summary.outcome("simple-chat").unwrap();
    assert!(outcome
        .changes
        .contains(&"model: command-r-plus→command-r".to_string()));
    assert!(!fixture
        .factory
        .contains(&ProviderKey::new(ProviderKind::Inference, "cohere", Some("command-r-plus"))));
    assert!(fixture
        .factory
        .contains(&ProviderKey::new(ProviderKind::Inference, "cohere", Some("command-r"))));
}

#[tokio::test]
async fn requests_in_flight_keep_their_handles_across_a_swap() {
    let fixture = Fixture::new(SIMPLE_CHAT);
    fixture.load_all().await;

    // A request resolves the live adapter before the reload
    let adapter = fixture.manager.get("simple-chat").unwrap();
    let held = Arc::clone(&adapter.resources().unwrap().inference);

    fixture.set_adapters(&SIMPLE_CHAT.replace(
        "inference_provider: cohere",
        "inference_provider: ollama",
    ));
    fixture.reload(None).await;

    // The old snapshot still works; a fresh lookup sees the new one
    assert_eq!(held.provider_name(), "cohere");
    let fresh = fixture.manager.get("simple-chat").unwrap();
    assert_eq!(
        fresh.resources().unwrap().inference.provider_name(),
        "ollama"
    );
}

#[tokio::test]
async fn cancelled_reload_processes_nothing_and_stays_consistent() {
    let fixture = Fixture::new(SIMPLE_CHAT);
    fixture.load_all().await;

    let cancel = CancellationToken::new();
    cancel.cancel();
    let summary = fixture.manager.reload(None, &cancel).await.unwrap();

    assert_eq!(summary.total, 0);
    assert_eq!(
        fixture.manager.adapter_state("simple-chat"),
        Some(AdapterState::Active)
    );
}

#[tokio::test]
async fn query_surface_reads_the_live_descriptor() {
    let fixture = Fixture::new(
        r#"adapters:
  - name: tz-chat
    enabled: true
    datasource: memory
    inference_provider: "null"
    config:
      timezone: America/New_York
      confidence_threshold: 0.3
"#,
    );
    fixture.load_all().await;

    assert_eq!(
        fixture.manager.timezone("tz-chat").as_deref(),
        Some("America/New_York")
    );
    assert_eq!(
        fixture.manager.inference_provider("tz-chat").as_deref(),
        Some("null")
    );
    let config = fixture.manager.adapter_config("tz-chat");
    assert_eq!(config.get("confidence_threshold").unwrap(), 0.3);
    // Unknown adapters yield an empty map, never null
    assert!(fixture
        .manager
        .adapter_config("missing")
        .as_object()
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn shutdown_releases_everything() {
    let fixture = Fixture::new(TWO_ADAPTERS);
    fixture.load_all().await;
    assert_eq!(fixture.registry.refcount("memory:shared"), Some(2));

    fixture.manager.shutdown().await;
    assert!(fixture.registry.is_empty());
    assert!(fixture.factory.is_empty(ProviderKind::Inference));
}
