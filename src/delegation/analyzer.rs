//! Query analysis
//!
//! Maps a task string to the keywords each delegation target matched, a
//! per-target confidence count, and a hint for whether the primary model
//! should handle the task natively.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::rules::RuleSet;

/// Generic phrases suggesting the primary model can handle a task itself.
/// Matched as plain substrings, in this order.
pub const NATIVE_PHRASES: &[&str] = &[
    "explain",
    "discuss",
    "analyze text",
    "summarize",
    "translate",
    "reason",
    "thought",
    "question",
    "how to",
    "why",
    "describe",
    "agi research",
    "time conscious",
];

/// Result of analyzing one task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryAnalysis {
    pub query: String,
    /// Matched keywords per target, in first-seen rule order
    pub triggers: IndexMap<String, Vec<String>>,
    /// Number of matched keywords per target
    pub confidence: IndexMap<String, usize>,
    pub native_handling_suggested: bool,
}

impl QueryAnalysis {
    /// Compact JSON rendering of the triggers for the changelog
    pub fn triggers_summary(&self) -> String {
        serde_json::to_string(&self.triggers).unwrap_or_else(|_| format!("{:?}", self.triggers))
    }

    pub fn has_matches(&self) -> bool {
        !self.triggers.is_empty()
    }
}

/// Analyze a task against the rule set
pub fn analyze(rules: &RuleSet, task: &str) -> QueryAnalysis {
    let task_lower = task.to_lowercase();
    let merge = rules.policy().merge_shared_targets;

    let mut triggers: IndexMap<String, Vec<String>> = IndexMap::new();
    for rule in rules.rules() {
        let matches = rule.matches(&task_lower);
        if matches.is_empty() {
            continue;
        }

        if merge {
            let slot = triggers.entry(rule.delegate_to.clone()).or_default();
            for kw in matches {
                if !slot.contains(&kw) {
                    slot.push(kw);
                }
            }
        } else {
            // Replaces an earlier rule's matches; the key keeps its original position.
            triggers.insert(rule.delegate_to.clone(), matches);
        }
    }

    let confidence = triggers
        .iter()
        .map(|(target, kws)| (target.clone(), kws.len()))
        .collect();

    let native_handling_suggested = native_phrase(&task_lower).is_some();

    QueryAnalysis {
        query: task.to_string(),
        triggers,
        confidence,
        native_handling_suggested,
    }
}

/// First native-handling phrase contained in the lower-cased task
pub fn native_phrase(task_lower: &str) -> Option<&'static str> {
    NATIVE_PHRASES.iter().copied().find(|phrase| task_lower.contains(phrase))
}
