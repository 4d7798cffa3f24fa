//! Adapter catalog extraction
//!
//! Parses the `adapters:` section of the merged config (post-import,
//! post-env-substitution) into descriptors. Missing or duplicate names
//! are hard load errors that abort the caller's reload.

use std::collections::HashSet;

use serde_json::Value;

use orbit_domain::error::{Error, Result};
use orbit_domain::value_objects::AdapterDescriptor;

/// Parse the adapter catalog from the merged config
pub fn load_catalog(config: &Value) -> Result<Vec<AdapterDescriptor>> {
    let Some(section) = config.get("adapters") else {
        return Ok(Vec::new());
    };
    if section.is_null() {
        return Ok(Vec::new());
    }
    let entries = section
        .as_array()
        .ok_or_else(|| Error::config("section 'adapters' must be a list"))?;

    let mut seen: HashSet<String> = HashSet::new();
    let mut descriptors = Vec::with_capacity(entries.len());
    for entry in entries {
        let descriptor = AdapterDescriptor::from_value(entry)?;
        if !seen.insert(descriptor.name.clone()) {
            return Err(Error::config(format!(
                "duplicate adapter name '{}'",
                descriptor.name
            )));
        }
        descriptors.push(descriptor);
    }
    Ok(descriptors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_section_yields_empty_catalog() {
        assert!(load_catalog(&json!({})).unwrap().is_empty());
    }

    #[test]
    fn duplicate_names_are_a_hard_error() {
        let config = json!({"adapters": [
            {"name": "simple-chat"},
            {"name": "simple-chat"}
        ]});
        let err = load_catalog(&config).unwrap_err();
        assert!(err.to_string().contains("duplicate adapter name"));
    }

    #[test]
    fn catalog_round_trips_through_serialization() {
        let config = json!({"adapters": [
            {"name": "a", "enabled": true, "datasource": "memory", "model": "m1"},
            {"name": "b", "enabled": false, "config": {"limit": 3}}
        ]});
        let catalog = load_catalog(&config).unwrap();
        let reserialized = json!({
            "adapters": catalog.iter().map(|d| serde_json::to_value(d).unwrap()).collect::<Vec<_>>()
        });
        assert_eq!(load_catalog(&reserialized).unwrap(), catalog);
    }
}
