//! Configuration loader
//!
//! Reads a root YAML file, recursively processes `import:` directives
//! (string or list, relative to the importing file), merges deeply with
//! last-write-wins in import order and the main file overriding its
//! imports, substitutes `${ENV_VAR}` tokens, validates, and caches the
//! merged tree for a short TTL.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use orbit_domain::error::{Error, Result};

/// Default TTL for the merged-config cache
pub const DEFAULT_CONFIG_TTL: Duration = Duration::from_secs(5);

struct CachedConfig {
    loaded_at: Instant,
    value: std::sync::Arc<Value>,
}

/// Configuration manager with import merging and a TTL cache
pub struct ConfigManager {
    root_path: PathBuf,
    ttl: Duration,
    cache: Mutex<Option<CachedConfig>>,
}

impl ConfigManager {
    /// Create a manager over the given root config file
    pub fn new<P: AsRef<Path>>(root_path: P) -> Self {
        Self {
            root_path: root_path.as_ref().to_path_buf(),
            ttl: DEFAULT_CONFIG_TTL,
            cache: Mutex::new(None),
        }
    }

    /// Override the cache TTL
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// The root config file path
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    /// Load the merged config, serving from cache within the TTL
    pub fn load(&self) -> Result<std::sync::Arc<Value>> {
        {
            let cache = self.cache.lock().expect("config cache lock poisoned");
            if let Some(cached) = cache.as_ref() {
                if cached.loaded_at.elapsed() < self.ttl {
                    return Ok(std::sync::Arc::clone(&cached.value));
                }
            }
        }

        let merged = self.load_fresh()?;
        let value = std::sync::Arc::new(merged);
        *self.cache.lock().expect("config cache lock poisoned") = Some(CachedConfig {
            loaded_at: Instant::now(),
            value: std::sync::Arc::clone(&value),
        });
        Ok(value)
    }

    /// Drop the cached tree so the next `load` re-reads from disk
    pub fn invalidate(&self) {
        *self.cache.lock().expect("config cache lock poisoned") = None;
    }

    fn load_fresh(&self) -> Result<Value> {
        let mut visiting = HashSet::new();
        let mut merged = load_file_with_imports(&self.root_path, &mut visiting)?;
        substitute_env(&mut merged);
        validate_config(&merged)?;
        debug!("Configuration loaded from {}", self.root_path.display());
        Ok(merged)
    }
}

/// Load one file, resolve its imports depth-first, and merge
fn load_file_with_imports(path: &Path, visiting: &mut HashSet<PathBuf>) -> Result<Value> {
    let canonical = path
        .canonicalize()
        .map_err(|e| Error::config_with_source(format!("config file {}", path.display()), e))?;
    if !visiting.insert(canonical.clone()) {
        return Err(Error::config(format!(
            "import cycle involving {}",
            path.display()
        )));
    }

    let raw = std::fs::read_to_string(&canonical)
        .map_err(|e| Error::config_with_source(format!("config file {}", path.display()), e))?;
    let yaml: serde_yaml::Value = serde_yaml::from_str(&raw)
        .map_err(|e| Error::config_with_source(format!("invalid YAML in {}", path.display()), e))?;
    let mut content = yaml_to_json(yaml, path)?;

    if content.is_null() {
        content = Value::Object(serde_json::Map::new());
    }
    let Value::Object(mut map) = content else {
        return Err(Error::config(format!(
            "{} must contain a top-level mapping",
            path.display()
        )));
    };

    let imports = match map.remove("import") {
        None => Vec::new(),
        Some(Value::String(s)) => vec![s],
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    Error::config(format!("{}: import entries must be strings", path.display()))
                })
            })
            .collect::<Result<Vec<_>>>()?,
        Some(_) => {
            return Err(Error::config(format!(
                "{}: import must be a string or a list of strings",
                path.display()
            )));
        }
    };

    let base_dir = canonical
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    // Imports merge in order (later wins), then the main file overrides
    let mut merged = Value::Object(serde_json::Map::new());
    for import in imports {
        let import_path = base_dir.join(&import);
        let imported = load_file_with_imports(&import_path, visiting)?;
        deep_merge(&mut merged, imported);
    }
    deep_merge(&mut merged, Value::Object(map));

    visiting.remove(&canonical);
    Ok(merged)
}

/// Deep merge: maps merge key-wise, scalars and lists override
fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// Substitute `${ENV_VAR}` tokens in every string scalar, warning (not
/// failing) when a referenced variable is unset
fn substitute_env(value: &mut Value) {
    let pattern = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("env token pattern");
    substitute_env_inner(value, &pattern);
}

fn substitute_env_inner(value: &mut Value, pattern: &Regex) {
    match value {
        Value::String(s) => {
            if pattern.is_match(s) {
                let replaced = pattern.replace_all(s, |caps: &regex::Captures<'_>| {
                    let var = &caps[1];
                    std::env::var(var).unwrap_or_else(|_| {
                        warn!("Environment variable '{}' is not set; substituting empty string", var);
                        String::new()
                    })
                });
                *s = replaced.into_owned();
            }
        }
        Value::Array(items) => {
            for item in items {
                substitute_env_inner(item, pattern);
            }
        }
        Value::Object(map) => {
            for (_, item) in map.iter_mut() {
                substitute_env_inner(item, pattern);
            }
        }
        _ => {}
    }
}

/// Convert a YAML tree to the canonical JSON representation
fn yaml_to_json(yaml: serde_yaml::Value, path: &Path) -> Result<Value> {
    serde_json::to_value(yaml)
        .map_err(|e| Error::config_with_source(format!("{}: unsupported YAML value", path.display()), e))
}

/// Structural validation of the merged tree
fn validate_config(config: &Value) -> Result<()> {
    let Some(map) = config.as_object() else {
        return Err(Error::config("merged configuration must be a mapping"));
    };

    for section in ["general", "inference", "embedding", "reranker", "vision", "datasources"] {
        if let Some(value) = map.get(section) {
            if !value.is_object() && !value.is_null() {
                return Err(Error::config(format!("section '{section}' must be a mapping")));
            }
        }
    }
    if let Some(adapters) = map.get("adapters") {
        if !adapters.is_array() && !adapters.is_null() {
            return Err(Error::config("section 'adapters' must be a list"));
        }
    }
    Ok(())
}
