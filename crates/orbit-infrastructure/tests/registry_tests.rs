//! Datasource registry tests: pooling, refcounts, lifecycle

use serde_json::json;

use orbit_infrastructure::registry::DatasourceRegistry;

fn config(namespace: &str) -> serde_json::Value {
    json!({"datasources": {"memory": {"namespace": namespace}}})
}

#[tokio::test]
async fn same_cache_key_shares_one_entry() {
    let registry = DatasourceRegistry::new();
    let cfg = config("shared");

    let a = registry.get_or_create("memory", &cfg).await.unwrap();
    let b = registry.get_or_create("memory", &cfg).await.unwrap();

    assert_eq!(a.cache_key(), "memory:shared");
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.refcount("memory:shared"), Some(2));
    // Both handles point at the same live instance
    assert!(std::sync::Arc::ptr_eq(a.datasource(), b.datasource()));

    registry.release(&a).await;
    registry.release(&b).await;
}

#[tokio::test]
async fn different_cache_keys_get_separate_entries() {
    let registry = DatasourceRegistry::new();

    let a = registry.get_or_create("memory", &config("one")).await.unwrap();
    let b = registry.get_or_create("memory", &config("two")).await.unwrap();

    assert_eq!(registry.len(), 2);
    assert_eq!(registry.refcount("memory:one"), Some(1));
    assert_eq!(registry.refcount("memory:two"), Some(1));

    registry.release(&a).await;
    registry.release(&b).await;
}

#[tokio::test]
async fn release_at_zero_closes_and_drops_the_entry() {
    let registry = DatasourceRegistry::new();
    let cfg = config("short-lived");

    let a = registry.get_or_create("memory", &cfg).await.unwrap();
    let b = registry.get_or_create("memory", &cfg).await.unwrap();
    let datasource = std::sync::Arc::clone(a.datasource());

    registry.release(&a).await;
    // One holder left: still pooled, still open
    assert_eq!(registry.refcount("memory:short-lived"), Some(1));
    assert!(datasource.health_check().await);

    registry.release(&b).await;
    assert_eq!(registry.refcount("memory:short-lived"), None);
    assert!(registry.is_empty());
    // Closed at refcount zero
    assert!(!datasource.health_check().await);
}

#[tokio::test]
async fn release_is_idempotent_per_handle() {
    let registry = DatasourceRegistry::new();
    let cfg = config("idem");

    let a = registry.get_or_create("memory", &cfg).await.unwrap();
    let b = registry.get_or_create("memory", &cfg).await.unwrap();

    registry.release(&a).await;
    registry.release(&a).await;
    registry.release(&a).await;
    // Double release through the same handle must not steal b's count
    assert_eq!(registry.refcount("memory:idem"), Some(1));

    registry.release(&b).await;
    assert!(registry.is_empty());
}

#[tokio::test]
async fn acquire_n_release_n_restores_the_initial_state() {
    let registry = DatasourceRegistry::new();
    let cfg = config("balanced");

    for _ in 0..3 {
        let mut handles = Vec::new();
        for _ in 0..5 {
            handles.push(registry.get_or_create("memory", &cfg).await.unwrap());
        }
        assert_eq!(registry.refcount("memory:balanced"), Some(5));
        for handle in &handles {
            registry.release(handle).await;
        }
        assert!(registry.is_empty());
    }
}

#[tokio::test]
async fn unknown_implementation_is_not_found() {
    let registry = DatasourceRegistry::new();
    let err = registry
        .get_or_create("no-such-backend", &json!({}))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        orbit_domain::error::Error::NotFound { .. }
    ));
}

#[tokio::test]
async fn health_check_all_probes_every_pooled_entry() {
    let registry = DatasourceRegistry::new();
    let a = registry.get_or_create("memory", &config("h1")).await.unwrap();
    let b = registry.get_or_create("memory", &config("h2")).await.unwrap();

    let mut results = registry.health_check_all().await;
    results.sort();
    assert_eq!(
        results,
        vec![("memory:h1".to_string(), true), ("memory:h2".to_string(), true)]
    );

    registry.release(&a).await;
    registry.release(&b).await;
}

#[tokio::test]
async fn concurrent_acquires_share_a_single_initialization() {
    let registry = std::sync::Arc::new(DatasourceRegistry::new());
    let cfg = config("race");

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let registry = std::sync::Arc::clone(&registry);
        let cfg = cfg.clone();
        tasks.push(tokio::spawn(async move {
            registry.get_or_create("memory", &cfg).await.unwrap()
        }));
    }

    let mut handles = Vec::new();
    for task in tasks {
        handles.push(task.await.unwrap());
    }

    assert_eq!(registry.len(), 1);
    assert_eq!(registry.refcount("memory:race"), Some(8));
    for handle in &handles {
        registry.release(handle).await;
    }
    assert!(registry.is_empty());
}
