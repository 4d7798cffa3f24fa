//! Descriptor diff engine and change classification
//!
//! `diff` compares two descriptors field by field and walks their nested
//! `config` trees, producing a deterministic, sorted set of changed
//! paths. `classify` turns a pair of optional descriptors into the
//! high-level action the reload engine dispatches on.
//!
//! Scalars are normalized before comparison (strings trimmed, numbers
//! compared by value) so YAML round-tripping cannot produce phantom
//! changes.

use serde_json::Value;

use super::descriptor::AdapterDescriptor;

/// One changed field with its old and new values
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    /// Dotted path: a top-level key (`model`) or a nested config path
    /// (`config.confidence_threshold`)
    pub path: String,
    /// Value on the old side, if present
    pub old: Option<Value>,
    /// Value on the new side, if present
    pub new: Option<Value>,
}

impl FieldChange {
    /// Render as `path: old→new` for change logs
    pub fn describe(&self) -> String {
        format!(
            "{}: {}→{}",
            self.path,
            format_value(self.old.as_ref()),
            format_value(self.new.as_ref())
        )
    }
}

/// Structured result of comparing two descriptors
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigDiff {
    /// Changed top-level keys, sorted
    pub changed_keys: Vec<String>,
    /// Changed nested config paths (dotted), sorted
    pub changed_paths: Vec<String>,
    /// Every change with old/new values, sorted by path
    pub changes: Vec<FieldChange>,
}

impl ConfigDiff {
    /// True when the two descriptors are equivalent
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Whether a specific top-level key changed
    pub fn key_changed(&self, key: &str) -> bool {
        self.changed_keys.iter().any(|k| k == key)
    }

    /// Whether only nested `config.*` paths changed
    pub fn nested_only(&self) -> bool {
        !self.is_empty() && self.changed_keys.is_empty()
    }

    /// Render every change as `key: old→new, ...` for the change log
    pub fn describe(&self) -> String {
        self.changes
            .iter()
            .map(FieldChange::describe)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// High-level action derived from classifying an old/new descriptor pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterChange {
    /// Descriptor appeared in the new catalog
    Add,
    /// Descriptor disappeared from the new catalog
    Remove,
    /// Descriptors are equivalent
    NoChange,
    /// `enabled` flipped true to false
    Disable,
    /// `enabled` flipped false to true
    Enable,
    /// Any other difference
    Update,
}

impl std::fmt::Display for AdapterChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Add => write!(f, "added"),
            Self::Remove => write!(f, "removed"),
            Self::NoChange => write!(f, "unchanged"),
            Self::Disable => write!(f, "disabled"),
            Self::Enable => write!(f, "enabled"),
            Self::Update => write!(f, "updated"),
        }
    }
}

/// Compare two descriptors and collect every changed path
pub fn diff(old: &AdapterDescriptor, new: &AdapterDescriptor) -> ConfigDiff {
    let mut changes: Vec<FieldChange> = Vec::new();

    compare_scalar(&mut changes, "enabled", &old.enabled, &new.enabled);
    compare_scalar(
        &mut changes,
        "datasource_ref",
        &old.datasource_ref,
        &new.datasource_ref,
    );
    compare_scalar(&mut changes, "type", &old.kind, &new.kind);
    compare_option(
        &mut changes,
        "inference_provider",
        &old.inference_provider,
        &new.inference_provider,
    );
    compare_option(&mut changes, "model", &old.model, &new.model);
    compare_option(
        &mut changes,
        "embedding_provider",
        &old.embedding_provider,
        &new.embedding_provider,
    );
    compare_option(
        &mut changes,
        "reranker_provider",
        &old.reranker_provider,
        &new.reranker_provider,
    );
    compare_option(
        &mut changes,
        "vision_provider",
        &old.vision_provider,
        &new.vision_provider,
    );

    walk_nested(&mut changes, "config", Some(&old.config), Some(&new.config));

    changes.sort_by(|a, b| a.path.cmp(&b.path));

    let mut changed_keys: Vec<String> = changes
        .iter()
        .filter(|c| !c.path.starts_with("config."))
        .map(|c| c.path.clone())
        .collect();
    changed_keys.sort();
    let mut changed_paths: Vec<String> = changes
        .iter()
        .filter(|c| c.path.starts_with("config."))
        .map(|c| c.path.clone())
        .collect();
    changed_paths.sort();

    debug_assert_eq!(changed_keys.len() + changed_paths.len(), changes.len());

    ConfigDiff {
        changed_keys,
        changed_paths,
        changes,
    }
}

/// Classify an old/new descriptor pair into a reload action
pub fn classify(
    old: Option<&AdapterDescriptor>,
    new: Option<&AdapterDescriptor>,
) -> AdapterChange {
    match (old, new) {
        (None, None) => AdapterChange::NoChange,
        (None, Some(_)) => AdapterChange::Add,
        (Some(_), None) => AdapterChange::Remove,
        (Some(o), Some(n)) => {
            if o.enabled && !n.enabled {
                return AdapterChange::Disable;
            }
            if !o.enabled && n.enabled {
                return AdapterChange::Enable;
            }
            // enabled is a diff key, so an empty diff implies the flag
            // matches on both sides
            if diff(o, n).is_empty() {
                AdapterChange::NoChange
            } else {
                AdapterChange::Update
            }
        }
    }
}

fn compare_scalar<T: PartialEq + Clone + serde::Serialize>(
    changes: &mut Vec<FieldChange>,
    key: &str,
    old: &T,
    new: &T,
) {
    if old != new {
        changes.push(FieldChange {
            path: key.to_string(),
            old: serde_json::to_value(old.clone()).ok(),
            new: serde_json::to_value(new.clone()).ok(),
        });
    }
}

fn compare_option(
    changes: &mut Vec<FieldChange>,
    key: &str,
    old: &Option<String>,
    new: &Option<String>,
) {
    let old_norm = old.as_ref().map(|s| s.trim());
    let new_norm = new.as_ref().map(|s| s.trim());
    if old_norm != new_norm {
        changes.push(FieldChange {
            path: key.to_string(),
            old: old.as_ref().map(|s| Value::String(s.clone())),
            new: new.as_ref().map(|s| Value::String(s.clone())),
        });
    }
}

fn walk_nested(
    changes: &mut Vec<FieldChange>,
    path: &str,
    old: Option<&Value>,
    new: Option<&Value>,
) {
    match (old, new) {
        (None, None) => {}
        (Some(Value::Object(old_map)), Some(Value::Object(new_map))) => {
            let mut keys: Vec<&String> = old_map.keys().chain(new_map.keys()).collect();
            keys.sort();
            keys.dedup();
            for key in keys {
                let child = format!("{path}.{key}");
                walk_nested(changes, &child, old_map.get(key), new_map.get(key));
            }
        }
        (old, new) => {
            // Scalars, lists, and present-vs-absent all resolve here;
            // lists compare by full equality on the parent path
            let equivalent = match (old, new) {
                (Some(a), Some(b)) => values_equal(a, b),
                _ => false,
            };
            if !equivalent {
                changes.push(FieldChange {
                    path: path.to_string(),
                    old: old.cloned(),
                    new: new.cloned(),
                });
            }
        }
    }
}

/// Value equality with scalar normalization
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::String(x), Value::String(y)) => x.trim() == y.trim(),
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(fx), Some(fy)) => fx == fy,
            _ => x == y,
        },
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(va, vb)| values_equal(va, vb))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(k, va)| y.get(k).is_some_and(|vb| values_equal(va, vb)))
        }
        _ => a == b,
    }
}

/// Render an optional value for change logs
fn format_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "none".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => serde_json::to_string(other).unwrap_or_else(|_| "?".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn descriptor(value: serde_json::Value) -> AdapterDescriptor {
        AdapterDescriptor::from_value(&value).unwrap()
    }

    fn simple_chat() -> AdapterDescriptor {
        descriptor(json!({
            "name": "simple-chat",
            "enabled": true,
            "datasource": "memory",
            "inference_provider": "cohere",
            "model": "command-r-plus",
            "config": {"confidence_threshold": 0.3}
        }))
    }

    #[test]
    fn diff_of_identical_descriptors_is_empty() {
        let a = simple_chat();
        assert!(diff(&a, &a.clone()).is_empty());
    }

    #[test]
    fn detects_top_level_change() {
        let old = simple_chat();
        let mut new = old.clone();
        new.model = Some("command-r".to_string());
        let d = diff(&old, &new);
        assert_eq!(d.changed_keys, vec!["model"]);
        assert!(d.changed_paths.is_empty());
        assert_eq!(d.describe(), "model: command-r-plus→command-r");
    }

    #[test]
    fn detects_nested_change_with_dotted_path() {
        let old = simple_chat();
        let mut new = old.clone();
        new.config = json!({"confidence_threshold": 0.5});
        let d = diff(&old, &new);
        assert!(d.changed_keys.is_empty());
        assert_eq!(d.changed_paths, vec!["config.confidence_threshold"]);
        assert!(d.nested_only());
        assert_eq!(d.describe(), "config.confidence_threshold: 0.3→0.5");
    }

    #[test]
    fn absent_versus_present_counts_as_change() {
        let old = simple_chat();
        let mut new = old.clone();
        new.config = json!({"confidence_threshold": 0.3, "max_results": 10});
        let d = diff(&old, &new);
        assert_eq!(d.changed_paths, vec!["config.max_results"]);
        assert_eq!(d.describe(), "config.max_results: none→10");
    }

    #[test]
    fn list_difference_reports_parent_path() {
        let old = descriptor(json!({
            "name": "a",
            "config": {"stop_words": ["x", "y"]}
        }));
        let mut new = old.clone();
        new.config = json!({"stop_words": ["x", "z"]});
        let d = diff(&old, &new);
        assert_eq!(d.changed_paths, vec!["config.stop_words"]);
    }

    #[test]
    fn whitespace_only_string_difference_is_not_a_change() {
        let old = descriptor(json!({
            "name": "a",
            "config": {"greeting": "hello"}
        }));
        let mut new = old.clone();
        new.config = json!({"greeting": "hello "});
        assert!(diff(&old, &new).is_empty());
    }

    #[test]
    fn integer_and_float_with_equal_value_are_not_a_change() {
        let old = descriptor(json!({"name": "a", "config": {"limit": 5}}));
        let mut new = old.clone();
        new.config = json!({"limit": 5.0});
        assert!(diff(&old, &new).is_empty());
    }

    #[test]
    fn output_is_sorted_and_deterministic() {
        let old = simple_chat();
        let mut new = old.clone();
        new.model = Some("command-r".to_string());
        new.inference_provider = Some("ollama".to_string());
        new.config = json!({"confidence_threshold": 0.5, "max_results": 3});
        let d = diff(&old, &new);
        assert_eq!(d.changed_keys, vec!["inference_provider", "model"]);
        assert_eq!(
            d.changed_paths,
            vec!["config.confidence_threshold", "config.max_results"]
        );
        let paths: Vec<&str> = d.changes.iter().map(|c| c.path.as_str()).collect();
        let mut sorted = paths.clone();
        sorted.sort();
        assert_eq!(paths, sorted);
    }

    #[test]
    fn classifies_add_remove_and_enable_transitions() {
        let enabled = simple_chat();
        let mut disabled = enabled.clone();
        disabled.enabled = false;

        assert_eq!(classify(None, Some(&enabled)), AdapterChange::Add);
        assert_eq!(classify(None, Some(&disabled)), AdapterChange::Add);
        assert_eq!(classify(Some(&enabled), None), AdapterChange::Remove);
        assert_eq!(
            classify(Some(&enabled), Some(&disabled)),
            AdapterChange::Disable
        );
        assert_eq!(
            classify(Some(&disabled), Some(&enabled)),
            AdapterChange::Enable
        );
        assert_eq!(
            classify(Some(&enabled), Some(&enabled)),
            AdapterChange::NoChange
        );
    }

    #[test]
    fn classifies_update_on_any_other_difference() {
        let old = simple_chat();
        let mut new = old.clone();
        new.config = json!({"confidence_threshold": 0.5});
        assert_eq!(classify(Some(&old), Some(&new)), AdapterChange::Update);
    }
}
