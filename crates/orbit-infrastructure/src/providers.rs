//! Provider factory
//!
//! Constructs inference/embedding/reranker/vision providers from the
//! merged config and caches them by `(kind, provider_name,
//! model_override)`. Entries carry a user count so shared handles
//! survive one holder leaving; `invalidate` removes exactly one entry
//! unconditionally, and in-flight requests already holding the handle
//! keep running against their `Arc`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::debug;

use orbit_application::ports::registry::{
    resolve_embedding_provider, resolve_inference_provider, resolve_reranker_provider,
    resolve_vision_provider, ProviderSettings,
};
use orbit_domain::error::{Error, Result};
use orbit_domain::ports::{
    EmbeddingProvider, InferenceProvider, RerankerProvider, VisionProvider,
};
use orbit_domain::value_objects::{ProviderKey, ProviderKind};

struct CacheSlot<T: ?Sized> {
    handle: Arc<T>,
    users: AtomicUsize,
}

/// Factory and keyed cache for the four provider kinds
pub struct ProviderFactory {
    inference: DashMap<ProviderKey, CacheSlot<dyn InferenceProvider>>,
    embedding: DashMap<ProviderKey, CacheSlot<dyn EmbeddingProvider>>,
    reranker: DashMap<ProviderKey, CacheSlot<dyn RerankerProvider>>,
    vision: DashMap<ProviderKey, CacheSlot<dyn VisionProvider>>,
    slots: DashMap<ProviderKey, Arc<Mutex<()>>>,
}

impl ProviderFactory {
    /// Create an empty factory
    pub fn new() -> Self {
        Self {
            inference: DashMap::new(),
            embedding: DashMap::new(),
            reranker: DashMap::new(),
            vision: DashMap::new(),
            slots: DashMap::new(),
        }
    }

    fn creation_slot(&self, key: &ProviderKey) -> Arc<Mutex<()>> {
        self.slots
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Look up the provider's config section, honoring the enabled flag
    fn settings(
        config: &Value,
        kind: ProviderKind,
        name: &str,
        model_override: Option<&str>,
    ) -> Result<ProviderSettings> {
        let section = config
            .pointer(&format!("/{}/{}", kind.config_section(), name))
            .ok_or_else(|| Error::not_configured(kind, name))?;
        if section.get("enabled").and_then(Value::as_bool) == Some(false) {
            return Err(Error::provider_disabled(kind, name));
        }

        let model = model_override
            .map(str::to_string)
            .or_else(|| section.get("model").and_then(Value::as_str).map(str::to_string));

        let mut settings = ProviderSettings::new(name).with_options(section.clone());
        if let Some(model) = model {
            settings = settings.with_model(model);
        }
        Ok(settings)
    }

    /// Get or create an inference provider, counting the caller as a
    /// user of the cache entry
    pub async fn get_or_create_inference(
        &self,
        config: &Value,
        name: &str,
        model_override: Option<&str>,
    ) -> Result<Arc<dyn InferenceProvider>> {
        let key = ProviderKey::new(ProviderKind::Inference, name, model_override);
        let slot = self.creation_slot(&key);
        let _guard = slot.lock().await;

        if let Some(entry) = self.inference.get(&key) {
            entry.users.fetch_add(1, Ordering::SeqCst);
            return Ok(Arc::clone(&entry.handle));
        }

        let settings = Self::settings(config, ProviderKind::Inference, name, model_override)?;
        let handle = resolve_inference_provider(&settings)?;
        handle.initialize().await?;
        debug!("Cached provider {}", key);
        self.inference.insert(
            key,
            CacheSlot {
                handle: Arc::clone(&handle),
                users: AtomicUsize::new(1),
            },
        );
        Ok(handle)
    }

    /// Get or create an embedding provider
    pub async fn get_or_create_embedding(
        &self,
        config: &Value,
        name: &str,
    ) -> Result<Arc<dyn EmbeddingProvider>> {
        let key = ProviderKey::new(ProviderKind::Embedding, name, None);
        let slot = self.creation_slot(&key);
        let _guard = slot.lock().await;

        if let Some(entry) = self.embedding.get(&key) {
            entry.users.fetch_add(1, Ordering::SeqCst);
            return Ok(Arc::clone(&entry.handle));
        }

        let settings = Self::settings(config, ProviderKind::Embedding, name, None)?;
        let handle = resolve_embedding_provider(&settings)?;
        handle.initialize().await?;
        debug!("Cached provider {}", key);
        self.embedding.insert(
            key,
            CacheSlot {
                handle: Arc::clone(&handle),
                users: AtomicUsize::new(1),
            },
        );
        Ok(handle)
    }

    /// Get or create a reranker provider
    pub async fn get_or_create_reranker(
        &self,
        config: &Value,
        name: &str,
    ) -> Result<Arc<dyn RerankerProvider>> {
        let key = ProviderKey::new(ProviderKind::Reranker, name, None);
        let slot = self.creation_slot(&key);
        let _guard = slot.lock().await;

        if let Some(entry) = self.reranker.get(&key) {
            entry.users.fetch_add(1, Ordering::SeqCst);
            return Ok(Arc::clone(&entry.handle));
        }

        let settings = Self::settings(config, ProviderKind::Reranker, name, None)?;
        let handle = resolve_reranker_provider(&settings)?;
        handle.initialize().await?;
        debug!("Cached provider {}", key);
        self.reranker.insert(
            key,
            CacheSlot {
                handle: Arc::clone(&handle),
                users: AtomicUsize::new(1),
            },
        );
        Ok(handle)
    }

    /// Get or create a vision provider
    pub async fn get_or_create_vision(
        &self,
        config: &Value,
        name: &str,
    ) -> Result<Arc<dyn VisionProvider>> {
        let key = ProviderKey::new(ProviderKind::Vision, name, None);
        let slot = self.creation_slot(&key);
        let _guard = slot.lock().await;

        if let Some(entry) = self.vision.get(&key) {
            entry.users.fetch_add(1, Ordering::SeqCst);
            return Ok(Arc::clone(&entry.handle));
        }

        let settings = Self::settings(config, ProviderKind::Vision, name, None)?;
        let handle = resolve_vision_provider(&settings)?;
        handle.initialize().await?;
        debug!("Cached provider {}", key);
        self.vision.insert(
            key,
            CacheSlot {
                handle: Arc::clone(&handle),
                users: AtomicUsize::new(1),
            },
        );
        Ok(handle)
    }

    /// Remove exactly one cache entry unconditionally. In-flight
    /// holders keep their handles; the next acquisition reconstructs.
    pub fn invalidate(&self, key: &ProviderKey) -> bool {
        let removed = match key.kind {
            ProviderKind::Inference => self.inference.remove(key).is_some(),
            ProviderKind::Embedding => self.embedding.remove(key).is_some(),
            ProviderKind::Reranker => self.reranker.remove(key).is_some(),
            ProviderKind::Vision => self.vision.remove(key).is_some(),
        };
        if removed {
            debug!("Invalidated provider cache entry {}", key);
        }
        removed
    }

    /// Drop one user of an entry; the entry itself is evicted only when
    /// its last user releases
    pub fn release(&self, key: &ProviderKey) -> bool {
        match key.kind {
            ProviderKind::Inference => Self::release_in(&self.inference, key),
            ProviderKind::Embedding => Self::release_in(&self.embedding, key),
            ProviderKind::Reranker => Self::release_in(&self.reranker, key),
            ProviderKind::Vision => Self::release_in(&self.vision, key),
        }
    }

    fn release_in<T: ?Sized>(map: &DashMap<ProviderKey, CacheSlot<T>>, key: &ProviderKey) -> bool {
        let evict = match map.get(key) {
            Some(entry) => entry.users.fetch_sub(1, Ordering::SeqCst) == 1,
            None => false,
        };
        if evict {
            map.remove(key);
            debug!("Evicted provider cache entry {}", key);
        }
        evict
    }

    /// Whether a cache entry exists for the key
    pub fn contains(&self, key: &ProviderKey) -> bool {
        match key.kind {
            ProviderKind::Inference => self.inference.contains_key(key),
            ProviderKind::Embedding => self.embedding.contains_key(key),
            ProviderKind::Reranker => self.reranker.contains_key(key),
            ProviderKind::Vision => self.vision.contains_key(key),
        }
    }

    /// Peek at a cached inference handle without counting a user
    pub fn peek_inference(
        &self,
        name: &str,
        model_override: Option<&str>,
    ) -> Option<Arc<dyn InferenceProvider>> {
        let key = ProviderKey::new(ProviderKind::Inference, name, model_override);
        self.inference.get(&key).map(|e| Arc::clone(&e.handle))
    }

    /// Number of cached entries for a kind
    pub fn len(&self, kind: ProviderKind) -> usize {
        match kind {
            ProviderKind::Inference => self.inference.len(),
            ProviderKind::Embedding => self.embedding.len(),
            ProviderKind::Reranker => self.reranker.len(),
            ProviderKind::Vision => self.vision.len(),
        }
    }

    /// Whether a kind's cache is empty
    pub fn is_empty(&self, kind: ProviderKind) -> bool {
        self.len(kind) == 0
    }
}

impl Default for ProviderFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ProviderFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderFactory")
            .field("inference", &self.inference.len())
            .field("embedding", &self.embedding.len())
            .field("reranker", &self.reranker.len())
            .field("vision", &self.vision.len())
            .finish()
    }
}
