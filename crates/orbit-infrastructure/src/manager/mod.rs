//! Adapter manager and hot-reload engine
//!
//! Owns the catalog of live adapters. A reload reconciles the live
//! catalog with a freshly merged config: per adapter it classifies the
//! change (add/remove/enable/disable/update/no-change), acquires new
//! resources outside the write lock, swaps the live entry under a brief
//! write lock, and releases replaced resources only after every
//! addition and update has acquired its own, so a datasource shared by
//! an old and a new descriptor never bounces.
//!
//! Cache-invalidation precision: an update that changes only nested
//! `config.*` paths touches no provider cache; an update that changes
//! `inference_provider` or `model` invalidates exactly the prior
//! `(inference, provider, model)` entry and leaves the other kinds
//! untouched.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, RwLock};

use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use orbit_application::ports::AdapterQuery;
use orbit_domain::error::{Error, Result};
use orbit_domain::ports::{
    EmbeddingProvider, InferenceProvider, RerankerProvider, VisionProvider,
};
use orbit_domain::value_objects::{
    classify, diff, AdapterChange, AdapterDescriptor, AdapterOutcome, AdapterState, FieldChange,
    ProviderKey, ProviderKind, ReloadSummary,
};

use crate::config::{load_catalog, ConfigManager};
use crate::providers::ProviderFactory;
use crate::registry::{DatasourceHandle, DatasourceRegistry};

const STATE_ACTIVE: u8 = 0;
const STATE_DISABLED: u8 = 1;
const STATE_DRAINING: u8 = 2;

/// Resolved dependency handles held by one live adapter
pub struct AdapterResources {
    /// Pooled datasource handle (shared by cache key)
    pub datasource: Arc<DatasourceHandle>,
    /// Inference provider handle
    pub inference: Arc<dyn InferenceProvider>,
    inference_key: ProviderKey,
    /// Embedding provider handle, when configured
    pub embedding: Option<Arc<dyn EmbeddingProvider>>,
    embedding_key: Option<ProviderKey>,
    /// Reranker provider handle, when configured
    pub reranker: Option<Arc<dyn RerankerProvider>>,
    reranker_key: Option<ProviderKey>,
    /// Vision provider handle, when configured
    pub vision: Option<Arc<dyn VisionProvider>>,
    vision_key: Option<ProviderKey>,
}

/// A materialized, usable adapter
///
/// Instances are immutable snapshots shared by reference: a request
/// that resolved one before a reload keeps its handles and runs to
/// completion against them.
pub struct LiveAdapter {
    /// The currently active descriptor
    pub descriptor: AdapterDescriptor,
    state: AtomicU8,
    resources: Option<AdapterResources>,
}

impl std::fmt::Debug for LiveAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveAdapter")
            .field("descriptor", &self.descriptor)
            .field("state", &self.state())
            .finish()
    }
}

impl LiveAdapter {
    fn active(descriptor: AdapterDescriptor, resources: AdapterResources) -> Self {
        Self {
            descriptor,
            state: AtomicU8::new(STATE_ACTIVE),
            resources: Some(resources),
        }
    }

    fn stub(descriptor: AdapterDescriptor) -> Self {
        Self {
            descriptor,
            state: AtomicU8::new(STATE_DISABLED),
            resources: None,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> AdapterState {
        match self.state.load(Ordering::SeqCst) {
            STATE_ACTIVE => AdapterState::Active,
            STATE_DISABLED => AdapterState::Disabled,
            _ => AdapterState::Draining,
        }
    }

    fn set_draining(&self) {
        self.state.store(STATE_DRAINING, Ordering::SeqCst);
    }

    /// Resolved resource handles; `None` for disabled stubs
    pub fn resources(&self) -> Option<&AdapterResources> {
        self.resources.as_ref()
    }
}

/// Summary row for the adapter list view
#[derive(Debug, Clone, Serialize)]
pub struct AdapterInfo {
    /// Adapter name
    pub name: String,
    /// Whether the descriptor is enabled
    pub enabled: bool,
    /// Lifecycle state
    pub state: AdapterState,
    /// Adapter kind tag
    #[serde(rename = "type")]
    pub kind: String,
    /// Datasource reference
    pub datasource: String,
    /// Inference provider override
    pub inference_provider: Option<String>,
    /// Model override
    pub model: Option<String>,
}

#[derive(Default)]
struct DeferredReleases {
    datasources: Vec<Arc<DatasourceHandle>>,
    providers: Vec<ProviderKey>,
}

/// Owns the live catalog and orchestrates hot reloads
pub struct AdapterManager {
    config: Arc<ConfigManager>,
    registry: Arc<DatasourceRegistry>,
    providers: Arc<ProviderFactory>,
    live: RwLock<HashMap<String, Arc<LiveAdapter>>>,
}

impl AdapterManager {
    /// Create a manager over the given config, pool, and factory
    pub fn new(
        config: Arc<ConfigManager>,
        registry: Arc<DatasourceRegistry>,
        providers: Arc<ProviderFactory>,
    ) -> Self {
        Self {
            config,
            registry,
            providers,
            live: RwLock::new(HashMap::new()),
        }
    }

    /// Initial population from the current config
    pub async fn load_all(&self, cancel: &CancellationToken) -> Result<ReloadSummary> {
        self.reload(None, cancel).await
    }

    /// Look up a live adapter (including disabled stubs)
    pub fn get(&self, name: &str) -> Result<Arc<LiveAdapter>> {
        self.live
            .read()
            .expect("live map lock poisoned")
            .get(name)
            .cloned()
            .ok_or_else(|| Error::unknown_adapter(name))
    }

    /// List every adapter in the live catalog, sorted by name
    pub fn list(&self) -> Vec<AdapterInfo> {
        let mut infos: Vec<AdapterInfo> = self
            .live
            .read()
            .expect("live map lock poisoned")
            .values()
            .map(|adapter| AdapterInfo {
                name: adapter.descriptor.name.clone(),
                enabled: adapter.descriptor.enabled,
                state: adapter.state(),
                kind: adapter.descriptor.kind.clone(),
                datasource: adapter.descriptor.datasource_ref.clone(),
                inference_provider: adapter.descriptor.inference_provider.clone(),
                model: adapter.descriptor.model.clone(),
            })
            .collect();
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        infos
    }

    /// The shared datasource registry (health endpoints probe through it)
    pub fn registry(&self) -> &Arc<DatasourceRegistry> {
        &self.registry
    }

    /// The shared provider factory
    pub fn provider_factory(&self) -> &Arc<ProviderFactory> {
        &self.providers
    }

    /// Reconcile the live catalog with a freshly loaded config.
    ///
    /// With `adapter_name` the reload is restricted to that single
    /// adapter; a name in neither the old nor the new catalog is
    /// `NotFound`. A catalog parse failure aborts the whole reload and
    /// leaves the live state unchanged. Per-adapter failures are
    /// isolated and reported in the summary. Cancellation between
    /// per-adapter steps leaves a processed prefix; each step is atomic.
    pub async fn reload(
        &self,
        adapter_name: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<ReloadSummary> {
        self.config.invalidate();
        let cfg = self.config.load()?;
        let catalog = load_catalog(&cfg)?;
        let default_provider = cfg
            .pointer("/general/inference_provider")
            .and_then(Value::as_str)
            .map(str::to_string);

        let new_set: HashMap<String, AdapterDescriptor> = catalog
            .into_iter()
            .map(|d| (d.name.clone(), d))
            .collect();
        let old_set: HashMap<String, Arc<LiveAdapter>> =
            self.live.read().expect("live map lock poisoned").clone();

        let names: Vec<String> = match adapter_name {
            Some(target) => {
                if !old_set.contains_key(target) && !new_set.contains_key(target) {
                    return Err(Error::not_found(format!("adapter '{target}'")));
                }
                vec![target.to_string()]
            }
            None => {
                let mut names: Vec<String> =
                    old_set.keys().chain(new_set.keys()).cloned().collect();
                names.sort();
                names.dedup();
                names
            }
        };

        let mut summary = ReloadSummary::default();
        let mut deferred = DeferredReleases::default();

        for name in names {
            if cancel.is_cancelled() {
                warn!("Adapter reload cancelled; processed a prefix of the catalog");
                break;
            }
            let old = old_set.get(&name);
            let new = new_set.get(&name);
            match self
                .apply_change(&cfg, default_provider.as_deref(), &name, old, new, &mut deferred)
                .await
            {
                Ok(outcome) => summary.record(outcome),
                Err(e) => {
                    error!("Reload failed for adapter '{}': {}", name, e);
                    summary.record(AdapterOutcome {
                        name: name.clone(),
                        action: "failed".to_string(),
                        changes: Vec::new(),
                        cleared: Vec::new(),
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        // Removals and disables release after additions and updates have
        // acquired, so a shared datasource never closes and reopens
        for key in deferred.providers {
            self.providers.release(&key);
        }
        for handle in deferred.datasources {
            self.registry.release(&handle).await;
        }

        info!("{}", summary.completion_line());
        Ok(summary)
    }

    /// Release every adapter's resources. Only for process shutdown.
    pub async fn shutdown(&self) {
        let drained: Vec<Arc<LiveAdapter>> = {
            let mut live = self.live.write().expect("live map lock poisoned");
            live.drain().map(|(_, adapter)| adapter).collect()
        };
        for adapter in drained {
            adapter.set_draining();
            if let Some(res) = adapter.resources() {
                for key in held_provider_keys(res) {
                    self.providers.release(&key);
                }
                self.registry.release(&res.datasource).await;
            }
        }
        self.registry.close_all().await;
    }

    async fn apply_change(
        &self,
        cfg: &Value,
        default_provider: Option<&str>,
        name: &str,
        old: Option<&Arc<LiveAdapter>>,
        new: Option<&AdapterDescriptor>,
        deferred: &mut DeferredReleases,
    ) -> Result<AdapterOutcome> {
        let change = classify(old.map(|a| &a.descriptor), new);
        match change {
            AdapterChange::NoChange => {
                info!("Unchanged adapter '{}'", name);
                Ok(outcome(name, "unchanged"))
            }
            AdapterChange::Add => {
                let descriptor = new.expect("add requires a new descriptor");
                if descriptor.enabled {
                    let resources = self
                        .build_resources(cfg, default_provider, descriptor)
                        .await?;
                    let model_override = descriptor.model.clone();
                    self.swap_in(Arc::new(LiveAdapter::active(
                        descriptor.clone(),
                        resources,
                    )));
                    info!("Reloaded adapter '{}'", name);
                    log_preload(name, model_override.as_deref());
                } else {
                    self.swap_in(Arc::new(LiveAdapter::stub(descriptor.clone())));
                    info!("Added disabled adapter '{}'", name);
                }
                Ok(outcome(name, "added"))
            }
            AdapterChange::Remove => {
                let adapter = old.expect("remove requires a live adapter");
                {
                    let mut live = self.live.write().expect("live map lock poisoned");
                    adapter.set_draining();
                    live.remove(name);
                }
                if let Some(res) = adapter.resources() {
                    deferred.providers.extend(held_provider_keys(res));
                    deferred.datasources.push(Arc::clone(&res.datasource));
                }
                info!("Removed adapter '{}'", name);
                Ok(outcome(name, "removed"))
            }
            AdapterChange::Disable => {
                let adapter = old.expect("disable requires a live adapter");
                let descriptor = new.expect("disable requires a new descriptor");
                self.swap_in(Arc::new(LiveAdapter::stub(descriptor.clone())));
                adapter.set_draining();

                let mut cleared = Vec::new();
                if let Some(res) = adapter.resources() {
                    for key in held_provider_keys(res) {
                        cleared.push(format!("{}:{}", category_label(key.kind), key.name));
                        deferred.providers.push(key);
                    }
                    deferred.datasources.push(Arc::clone(&res.datasource));
                }
                info!("Disabled adapter '{}'", name);
                if !cleared.is_empty() {
                    info!(
                        "Cleared dependency caches for adapter '{}': {}",
                        name,
                        cleared.join(", ")
                    );
                }
                Ok(AdapterOutcome {
                    name: name.to_string(),
                    action: "disabled".to_string(),
                    changes: Vec::new(),
                    cleared,
                    error: None,
                })
            }
            AdapterChange::Enable => {
                let descriptor = new.expect("enable requires a new descriptor");
                let resources = self
                    .build_resources(cfg, default_provider, descriptor)
                    .await?;
                let model_override = descriptor.model.clone();
                if let Some(previous) = old {
                    previous.set_draining();
                }
                self.swap_in(Arc::new(LiveAdapter::active(
                    descriptor.clone(),
                    resources,
                )));
                info!("Reloaded adapter '{}'", name);
                log_preload(name, model_override.as_deref());
                Ok(outcome(name, "enabled"))
            }
            AdapterChange::Update => {
                self.apply_update(cfg, default_provider, name, old, new, deferred)
                    .await
            }
        }
    }

    /// Update in place: swap the descriptor, clearing exactly the
    /// dependency caches whose configured identity changed
    async fn apply_update(
        &self,
        cfg: &Value,
        default_provider: Option<&str>,
        name: &str,
        old: Option<&Arc<LiveAdapter>>,
        new: Option<&AdapterDescriptor>,
        deferred: &mut DeferredReleases,
    ) -> Result<AdapterOutcome> {
        let adapter = old.expect("update requires a live adapter");
        let descriptor = new.expect("update requires a new descriptor");
        let old_descriptor = &adapter.descriptor;
        let changeset = diff(old_descriptor, descriptor);
        let change_lines: Vec<String> =
            changeset.changes.iter().map(FieldChange::describe).collect();
        info!("config changes for '{}': {}", name, changeset.describe());

        // Both sides disabled: swap the stub descriptor, nothing to clear
        if !descriptor.enabled {
            self.swap_in(Arc::new(LiveAdapter::stub(descriptor.clone())));
            adapter.set_draining();
            info!("Reloaded adapter '{}'", name);
            return Ok(AdapterOutcome {
                name: name.to_string(),
                action: "updated".to_string(),
                changes: change_lines,
                cleared: Vec::new(),
                error: None,
            });
        }

        let old_res = adapter.resources().ok_or_else(|| {
            Error::internal(format!("active adapter '{name}' has no resources"))
        })?;

        let mut cleared = Vec::new();
        let mut acquired_provider_keys: Vec<ProviderKey> = Vec::new();
        let mut acquired_datasource: Option<Arc<DatasourceHandle>> = None;

        // Roll back acquisitions if any later step fails so the old
        // adapter stays live with balanced refcounts
        let result: Result<AdapterResources> = async {
            let datasource = if changeset.key_changed("datasource_ref") {
                let handle = Arc::new(
                    self.registry
                        .get_or_create(&descriptor.datasource_ref, cfg)
                        .await?,
                );
                acquired_datasource = Some(Arc::clone(&handle));
                handle
            } else {
                Arc::clone(&old_res.datasource)
            };

            let provider_changed =
                changeset.key_changed("inference_provider") || changeset.key_changed("model");
            let (inference, inference_key) = if provider_changed {
                self.providers.invalidate(&old_res.inference_key);
                let provider_name =
                    resolved_inference_name(descriptor, default_provider)?;
                let handle = self
                    .providers
                    .get_or_create_inference(cfg, &provider_name, descriptor.model.as_deref())
                    .await?;
                let key = ProviderKey::new(
                    ProviderKind::Inference,
                    &provider_name,
                    descriptor.model.as_deref(),
                );
                acquired_provider_keys.push(key.clone());
                cleared.push(format!("provider:{provider_name}"));
                (handle, key)
            } else {
                (
                    Arc::clone(&old_res.inference),
                    old_res.inference_key.clone(),
                )
            };

            let (embedding, embedding_key) = if changeset.key_changed("embedding_provider") {
                if let Some(old_key) = &old_res.embedding_key {
                    self.providers.invalidate(old_key);
                }
                match &descriptor.embedding_provider {
                    Some(provider_name) => {
                        let handle = self
                            .providers
                            .get_or_create_embedding(cfg, provider_name)
                            .await?;
                        let key =
                            ProviderKey::new(ProviderKind::Embedding, provider_name, None);
                        acquired_provider_keys.push(key.clone());
                        cleared.push(format!("embedding:{provider_name}"));
                        (Some(handle), Some(key))
                    }
                    None => {
                        if let Some(old_key) = &old_res.embedding_key {
                            cleared.push(format!("embedding:{}", old_key.name));
                        }
                        (None, None)
                    }
                }
            } else {
                (old_res.embedding.clone(), old_res.embedding_key.clone())
            };

            let (reranker, reranker_key) = if changeset.key_changed("reranker_provider") {
                if let Some(old_key) = &old_res.reranker_key {
                    self.providers.invalidate(old_key);
                }
                match &descriptor.reranker_provider {
                    Some(provider_name) => {
                        let handle = self
                            .providers
                            .get_or_create_reranker(cfg, provider_name)
                            .await?;
                        let key =
                            ProviderKey::new(ProviderKind::Reranker, provider_name, None);
                        acquired_provider_keys.push(key.clone());
                        cleared.push(format!("reranker:{provider_name}"));
                        (Some(handle), Some(key))
                    }
                    None => {
                        if let Some(old_key) = &old_res.reranker_key {
                            cleared.push(format!("reranker:{}", old_key.name));
                        }
                        (None, None)
                    }
                }
            } else {
                (old_res.reranker.clone(), old_res.reranker_key.clone())
            };

            let (vision, vision_key) = if changeset.key_changed("vision_provider") {
                if let Some(old_key) = &old_res.vision_key {
                    self.providers.invalidate(old_key);
                }
                match &descriptor.vision_provider {
                    Some(provider_name) => {
                        let handle =
                            self.providers.get_or_create_vision(cfg, provider_name).await?;
                        let key = ProviderKey::new(ProviderKind::Vision, provider_name, None);
                        acquired_provider_keys.push(key.clone());
                        cleared.push(format!("vision:{provider_name}"));
                        (Some(handle), Some(key))
                    }
                    None => {
                        if let Some(old_key) = &old_res.vision_key {
                            cleared.push(format!("vision:{}", old_key.name));
                        }
                        (None, None)
                    }
                }
            } else {
                (old_res.vision.clone(), old_res.vision_key.clone())
            };

            Ok(AdapterResources {
                datasource,
                inference,
                inference_key,
                embedding,
                embedding_key,
                reranker,
                reranker_key,
                vision,
                vision_key,
            })
        }
        .await;

        let resources = match result {
            Ok(resources) => resources,
            Err(e) => {
                for key in acquired_provider_keys {
                    self.providers.release(&key);
                }
                if let Some(handle) = acquired_datasource {
                    self.registry.release(&handle).await;
                }
                return Err(e);
            }
        };

        let provider_changed =
            changeset.key_changed("inference_provider") || changeset.key_changed("model");
        if changeset.key_changed("datasource_ref") {
            deferred.datasources.push(Arc::clone(&old_res.datasource));
        }

        let model_override = descriptor.model.clone();
        self.swap_in(Arc::new(LiveAdapter::active(descriptor.clone(), resources)));
        adapter.set_draining();

        if !cleared.is_empty() {
            info!(
                "Cleared dependency caches for adapter '{}': {}",
                name,
                cleared.join(", ")
            );
        }
        info!("Reloaded adapter '{}'", name);
        // The inference provider is preloaded only when the provider or
        // model changed; nested-only updates make no network calls
        if provider_changed {
            log_preload(name, model_override.as_deref());
        }

        Ok(AdapterOutcome {
            name: name.to_string(),
            action: "updated".to_string(),
            changes: change_lines,
            cleared,
            error: None,
        })
    }

    /// Acquire every dependency for an enabled descriptor, rolling back
    /// on partial failure so refcounts stay balanced
    async fn build_resources(
        &self,
        cfg: &Value,
        default_provider: Option<&str>,
        descriptor: &AdapterDescriptor,
    ) -> Result<AdapterResources> {
        let datasource = Arc::new(
            self.registry
                .get_or_create(&descriptor.datasource_ref, cfg)
                .await?,
        );

        let mut acquired: Vec<ProviderKey> = Vec::new();
        let result: Result<AdapterResources> = async {
            let provider_name = resolved_inference_name(descriptor, default_provider)?;
            let inference = self
                .providers
                .get_or_create_inference(cfg, &provider_name, descriptor.model.as_deref())
                .await?;
            let inference_key = ProviderKey::new(
                ProviderKind::Inference,
                &provider_name,
                descriptor.model.as_deref(),
            );
            acquired.push(inference_key.clone());

            let (embedding, embedding_key) = match &descriptor.embedding_provider {
                Some(name) => {
                    let handle = self.providers.get_or_create_embedding(cfg, name).await?;
                    let key = ProviderKey::new(ProviderKind::Embedding, name, None);
                    acquired.push(key.clone());
                    (Some(handle), Some(key))
                }
                None => (None, None),
            };
            let (reranker, reranker_key) = match &descriptor.reranker_provider {
                Some(name) => {
                    let handle = self.providers.get_or_create_reranker(cfg, name).await?;
                    let key = ProviderKey::new(ProviderKind::Reranker, name, None);
                    acquired.push(key.clone());
                    (Some(handle), Some(key))
                }
                None => (None, None),
            };
            let (vision, vision_key) = match &descriptor.vision_provider {
                Some(name) => {
                    let handle = self.providers.get_or_create_vision(cfg, name).await?;
                    let key = ProviderKey::new(ProviderKind::Vision, name, None);
                    acquired.push(key.clone());
                    (Some(handle), Some(key))
                }
                None => (None, None),
            };

            Ok(AdapterResources {
                datasource: Arc::clone(&datasource),
                inference,
                inference_key,
                embedding,
                embedding_key,
                reranker,
                reranker_key,
                vision,
                vision_key,
            })
        }
        .await;

        match result {
            Ok(resources) => Ok(resources),
            Err(e) => {
                for key in acquired {
                    self.providers.release(&key);
                }
                self.registry.release(&datasource).await;
                Err(e)
            }
        }
    }

    /// Insert or replace a live entry. The write lock wraps only the
    /// map mutation.
    fn swap_in(&self, adapter: Arc<LiveAdapter>) {
        let name = adapter.descriptor.name.clone();
        self.live
            .write()
            .expect("live map lock poisoned")
            .insert(name, adapter);
    }
}

impl AdapterQuery for AdapterManager {
    fn adapter_state(&self, name: &str) -> Option<AdapterState> {
        self.live
            .read()
            .expect("live map lock poisoned")
            .get(name)
            .map(|adapter| adapter.state())
    }

    fn adapter_config(&self, name: &str) -> Value {
        self.live
            .read()
            .expect("live map lock poisoned")
            .get(name)
            .map(|adapter| adapter.descriptor.config.clone())
            .unwrap_or_else(|| Value::Object(serde_json::Map::new()))
    }

    fn inference_provider(&self, name: &str) -> Option<String> {
        self.live
            .read()
            .expect("live map lock poisoned")
            .get(name)
            .and_then(|adapter| adapter.descriptor.inference_provider.clone())
    }

    fn timezone(&self, name: &str) -> Option<String> {
        self.live
            .read()
            .expect("live map lock poisoned")
            .get(name)
            .and_then(|adapter| {
                adapter
                    .descriptor
                    .config_value("timezone")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
    }
}

impl std::fmt::Debug for AdapterManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterManager")
            .field(
                "adapters",
                &self.live.read().expect("live map lock poisoned").len(),
            )
            .finish()
    }
}

fn outcome(name: &str, action: &str) -> AdapterOutcome {
    AdapterOutcome {
        name: name.to_string(),
        action: action.to_string(),
        changes: Vec::new(),
        cleared: Vec::new(),
        error: None,
    }
}

fn resolved_inference_name(
    descriptor: &AdapterDescriptor,
    default_provider: Option<&str>,
) -> Result<String> {
    descriptor
        .inference_provider
        .clone()
        .or_else(|| default_provider.map(str::to_string))
        .ok_or_else(|| {
            Error::config(format!(
                "adapter '{}': no inference provider configured and no process default",
                descriptor.name
            ))
        })
}

fn held_provider_keys(res: &AdapterResources) -> Vec<ProviderKey> {
    let mut keys = vec![res.inference_key.clone()];
    keys.extend(res.embedding_key.clone());
    keys.extend(res.reranker_key.clone());
    keys.extend(res.vision_key.clone());
    keys
}

fn category_label(kind: ProviderKind) -> &'static str {
    match kind {
        ProviderKind::Inference => "provider",
        ProviderKind::Embedding => "embedding",
        ProviderKind::Reranker => "reranker",
        ProviderKind::Vision => "vision",
    }
}

fn log_preload(name: &str, model_override: Option<&str>) {
    match model_override {
        Some(model) => info!(
            "Preloaded inference provider for adapter '{}' with model override '{}'",
            name, model
        ),
        None => info!("Preloaded inference provider for adapter '{}'", name),
    }
}
