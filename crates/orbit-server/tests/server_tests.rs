//! Router tests: reload endpoint, auth, chat dispatch

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use orbit_application::ports::AdapterQuery;
use orbit_application::use_cases::RequestContextBuilder;
use orbit_infrastructure::config::{AuthConfig, ConfigManager, GeneralConfig};
use orbit_infrastructure::{AdapterManager, DatasourceRegistry, ProviderFactory};
use orbit_server::{router, AppState};

const CONFIG: &str = r#"general:
  inference_provider: "null"
inference:
  "null": {}
datasources:
  memory:
    namespace: server-test
adapters:
  - name: echo-chat
    enabled: true
    datasource: memory
    inference_provider: "null"
  - name: dormant
    enabled: false
    datasource: memory
"#;

async fn build_app(auth: AuthConfig) -> (TempDir, Router) {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("config.yaml"), CONFIG).unwrap();

    let config = Arc::new(
        ConfigManager::new(dir.path().join("config.yaml")).with_ttl(Duration::ZERO),
    );
    let merged = config.load().unwrap();
    let general = GeneralConfig::from_config(&merged).unwrap();

    let manager = Arc::new(AdapterManager::new(
        config,
        Arc::new(DatasourceRegistry::new()),
        Arc::new(ProviderFactory::new()),
    ));
    manager.load_all(&CancellationToken::new()).await.unwrap();

    let catalog: Arc<dyn AdapterQuery> = manager.clone() as Arc<dyn AdapterQuery>;
    let context_builder = Arc::new(RequestContextBuilder::new(
        catalog,
        general.inference_provider,
        general.timezone,
    ));

    let app = router(AppState {
        manager,
        context_builder,
        auth,
    });
    (dir, app)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn reload_returns_a_summary_object() {
    let (_dir, app) = build_app(AuthConfig::default()).await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/reload-adapters")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let summary = &body["summary"];
    assert_eq!(summary["unchanged"], 2);
    assert_eq!(summary["total"], 2);
    assert_eq!(summary["failed"], 0);
}

#[tokio::test]
async fn reload_of_unknown_adapter_is_404() {
    let (_dir, app) = build_app(AuthConfig::default()).await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/reload-adapters?adapter_name=nonexistent-adapter-12345")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_requires_bearer_token_when_auth_enabled() {
    let auth = AuthConfig {
        enabled: true,
        token: Some("orbit-secret".to_string()),
    };
    let (_dir, app) = build_app(auth).await;

    let denied = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/reload-adapters")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);

    let wrong = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/reload-adapters")
                .header("Authorization", "Bearer wrong")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

    let allowed = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/reload-adapters")
                .header("Authorization", "Bearer orbit-secret")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(allowed.status(), StatusCode::OK);
}

#[tokio::test]
async fn chat_dispatches_through_the_adapter() {
    let (_dir, app) = build_app(AuthConfig::default()).await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/chat")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({"message": "Hello, world!", "adapter": "echo-chat"})
                        .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["response"].as_str().unwrap().contains("Hello, world!"));
    assert_eq!(body["adapter"], "echo-chat");
    assert!(!body["request_id"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn chat_against_unknown_adapter_is_404() {
    let (_dir, app) = build_app(AuthConfig::default()).await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/chat")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({"message": "hi", "adapter": "missing"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn chat_against_disabled_adapter_is_conflict() {
    let (_dir, app) = build_app(AuthConfig::default()).await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/chat")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({"message": "hi", "adapter": "dormant"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn adapter_list_reports_state() {
    let (_dir, app) = build_app(AuthConfig::default()).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/admin/adapters")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let adapters = body.as_array().unwrap();
    assert_eq!(adapters.len(), 2);
    assert_eq!(adapters[0]["name"], "dormant");
    assert_eq!(adapters[0]["state"], "disabled");
    assert_eq!(adapters[1]["name"], "echo-chat");
    assert_eq!(adapters[1]["state"], "active");
}

#[tokio::test]
async fn health_reports_pooled_datasources() {
    let (_dir, app) = build_app(AuthConfig::default()).await;

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "up");
    assert!(body["checks"]["memory:server-test"]["status"] == "up");
}
