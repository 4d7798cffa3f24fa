//! Reload summaries returned to the admin caller

use serde::{Deserialize, Serialize};

/// Outcome of one adapter's reload step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdapterOutcome {
    /// Adapter name
    pub name: String,
    /// Action taken: `added`, `removed`, `updated`, `enabled`,
    /// `disabled`, `unchanged`, or `failed`
    pub action: String,
    /// Human-readable `key: old→new` fragments, one per changed path
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<String>,
    /// Dependency cache categories cleared for this adapter
    /// (`provider:<p>`, `embedding:<e>`, ...)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cleared: Vec<String>,
    /// Failure reason when the action is `failed`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate counts for one reload pass
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReloadSummary {
    /// Adapters added
    pub added: usize,
    /// Adapters removed
    pub removed: usize,
    /// Adapters updated in place
    pub updated: usize,
    /// Adapters enabled
    pub enabled: usize,
    /// Adapters disabled
    pub disabled: usize,
    /// Adapters left untouched
    pub unchanged: usize,
    /// Adapters whose reload failed
    pub failed: usize,
    /// Total adapters considered
    pub total: usize,
    /// Per-adapter detail
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub per_adapter: Vec<AdapterOutcome>,
}

impl ReloadSummary {
    /// Record one outcome, bumping the matching counter
    pub fn record(&mut self, outcome: AdapterOutcome) {
        match outcome.action.as_str() {
            "added" => self.added += 1,
            "removed" => self.removed += 1,
            "updated" => self.updated += 1,
            "enabled" => self.enabled += 1,
            "disabled" => self.disabled += 1,
            "unchanged" => self.unchanged += 1,
            "failed" => self.failed += 1,
            _ => {}
        }
        self.total += 1;
        self.per_adapter.push(outcome);
    }

    /// The completion log line operators and tests assert on
    pub fn completion_line(&self) -> String {
        format!(
            "Adapter reload complete: added={}, removed={}, updated={}, unchanged={}, total={}",
            self.added, self.removed, self.updated, self.unchanged, self.total
        )
    }

    /// Look up the outcome for a specific adapter
    pub fn outcome(&self, name: &str) -> Option<&AdapterOutcome> {
        self.per_adapter.iter().find(|o| o.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_bumps_counters_and_total() {
        let mut summary = ReloadSummary::default();
        summary.record(AdapterOutcome {
            name: "a".into(),
            action: "added".into(),
            changes: vec![],
            cleared: vec![],
            error: None,
        });
        summary.record(AdapterOutcome {
            name: "b".into(),
            action: "failed".into(),
            changes: vec![],
            cleared: vec![],
            error: Some("datasource init failed".into()),
        });
        assert_eq!(summary.added, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total, 2);
        assert_eq!(
            summary.completion_line(),
            "Adapter reload complete: added=1, removed=0, updated=0, unchanged=0, total=2"
        );
    }
}
