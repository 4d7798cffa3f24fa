//! Datasource registry and connection pool
//!
//! Shares expensive backend clients across adapters that target the same
//! physical backend. Instances are pooled by their datasource-defined
//! cache key with explicit reference counts; only the registry closes a
//! datasource, and only when its last holder releases.
//!
//! Concurrency: get/release are serialized per cache key through a
//! per-slot mutex; operations on different keys proceed in parallel.
//! Health probes take the same slot lock so they never overlap a close.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use orbit_application::ports::registry::{resolve_datasource, DatasourceSettings};
use orbit_domain::error::Result;
use orbit_domain::ports::Datasource;

struct PoolEntry {
    datasource: Arc<dyn Datasource>,
    refcount: AtomicUsize,
}

/// Registry-owned handle to a pooled datasource
///
/// Holders never close the datasource themselves; they hand the handle
/// back through [`DatasourceRegistry::release`]. Releasing twice through
/// the same handle is a no-op.
pub struct DatasourceHandle {
    key: String,
    datasource: Arc<dyn Datasource>,
    released: AtomicBool,
}

impl DatasourceHandle {
    /// The pool cache key this handle counts against
    pub fn cache_key(&self) -> &str {
        &self.key
    }

    /// The shared datasource
    pub fn datasource(&self) -> &Arc<dyn Datasource> {
        &self.datasource
    }
}

impl std::fmt::Debug for DatasourceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasourceHandle")
            .field("key", &self.key)
            .field("released", &self.released.load(Ordering::SeqCst))
            .finish()
    }
}

/// Reference-counted pool over the registered datasource implementations
pub struct DatasourceRegistry {
    pool: DashMap<String, Arc<PoolEntry>>,
    slots: DashMap<String, Arc<Mutex<()>>>,
}

impl DatasourceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            pool: DashMap::new(),
            slots: DashMap::new(),
        }
    }

    fn slot(&self, key: &str) -> Arc<Mutex<()>> {
        self.slots
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Acquire a shared datasource for the named implementation.
    ///
    /// Builds a candidate from `datasources.<name>` in the merged
    /// config; when a pooled entry with the candidate's cache key is
    /// already live its refcount is incremented and the candidate is
    /// discarded without ever being initialized. Otherwise the candidate
    /// is initialized and inserted; an initialization failure surfaces
    /// and leaves the pool untouched.
    pub async fn get_or_create(&self, name: &str, config: &Value) -> Result<DatasourceHandle> {
        let options = config
            .pointer(&format!("/datasources/{name}"))
            .cloned()
            .unwrap_or_else(|| Value::Object(serde_json::Map::new()));
        let settings = DatasourceSettings::new(name).with_options(options);
        let candidate = resolve_datasource(&settings)?;
        let key = candidate.cache_key();

        let slot = self.slot(&key);
        let _guard = slot.lock().await;

        if let Some(entry) = self.pool.get(&key) {
            entry.refcount.fetch_add(1, Ordering::SeqCst);
            debug!("Reusing pooled datasource '{}' (key: {})", name, key);
            return Ok(DatasourceHandle {
                key: key.clone(),
                datasource: Arc::clone(&entry.datasource),
                released: AtomicBool::new(false),
            });
        }

        candidate.initialize().await?;
        self.pool.insert(
            key.clone(),
            Arc::new(PoolEntry {
                datasource: Arc::clone(&candidate),
                refcount: AtomicUsize::new(1),
            }),
        );
        info!("Initialized datasource '{}' (key: {})", name, key);

        Ok(DatasourceHandle {
            key,
            datasource: candidate,
            released: AtomicBool::new(false),
        })
    }

    /// Hand a handle back. At refcount zero the entry is closed and
    /// dropped. Idempotent per handle.
    pub async fn release(&self, handle: &DatasourceHandle) {
        if handle.released.swap(true, Ordering::SeqCst) {
            return;
        }

        let slot = self.slot(&handle.key);
        let _guard = slot.lock().await;

        let drop_entry = match self.pool.get(&handle.key) {
            Some(entry) => entry.refcount.fetch_sub(1, Ordering::SeqCst) == 1,
            None => {
                warn!("Release for unknown datasource key {}", handle.key);
                false
            }
        };

        if drop_entry {
            if let Some((_, entry)) = self.pool.remove(&handle.key) {
                entry.datasource.close().await;
                info!("Closed datasource (key: {})", handle.key);
            }
        }
    }

    /// Current refcount for a cache key, `None` when not pooled
    pub fn refcount(&self, key: &str) -> Option<usize> {
        self.pool
            .get(key)
            .map(|entry| entry.refcount.load(Ordering::SeqCst))
    }

    /// Number of live pool entries
    pub fn len(&self) -> usize {
        self.pool.len()
    }

    /// Whether the pool holds no live entries
    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    /// Probe every pooled datasource, returning `(cache_key, healthy)`
    pub async fn health_check_all(&self) -> Vec<(String, bool)> {
        let keys: Vec<String> = self.pool.iter().map(|e| e.key().clone()).collect();
        let mut results = Vec::with_capacity(keys.len());
        for key in keys {
            let slot = self.slot(&key);
            let _guard = slot.lock().await;
            if let Some(entry) = self.pool.get(&key) {
                let datasource = Arc::clone(&entry.datasource);
                drop(entry);
                let healthy = datasource.health_check().await;
                results.push((key, healthy));
            }
        }
        results
    }

    /// Close every pooled datasource regardless of refcount. Only for
    /// process shutdown.
    pub async fn close_all(&self) {
        let keys: Vec<String> = self.pool.iter().map(|e| e.key().clone()).collect();
        for key in keys {
            let slot = self.slot(&key);
            let _guard = slot.lock().await;
            if let Some((_, entry)) = self.pool.remove(&key) {
                entry.datasource.close().await;
                info!("Closed datasource (key: {})", key);
            }
        }
    }
}

impl Default for DatasourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DatasourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasourceRegistry")
            .field("entries", &self.pool.len())
            .finish()
    }
}
