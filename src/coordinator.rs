//! Request coordinator
//!
//! Runs one task through analyze -> decide -> log and returns the result text.
//! Owns its session log; the log lives and dies with the coordinator.

use chrono::Local;

use crate::delegation::{self, Decision, QueryAnalysis, RuleSet};
use crate::session::{ChangelogEntry, NewEntry, SessionLog, excerpt};

/// Default input type when the caller does not name one
pub const DEFAULT_INPUT_TYPE: &str = "text";

/// Queries exercised by the `demo` command
pub const DEMO_QUERIES: &[(&str, &str)] = &[
    ("Write a Python function to calculate fibonacci sequence", "text"),
    ("Generate a logo for a tech startup", "text"),
    ("Help me debug this JavaScript code", "text"),
    ("Explain the concept of quantum computing", "text"),
    ("How can I optimize my AGI research workflow?", "text"),
    ("Generate a Python script for data analysis", "text"),
    ("What are your thoughts on AI safety?", "text"),
    ("Fix this Python syntax error: print('hello world'", "text"),
];

pub struct Coordinator {
    rules: RuleSet,
    log: SessionLog,
}

impl Coordinator {
    pub fn new(rules: RuleSet) -> Self {
        log::info!(
            "Coordinator ready: primary={}, rules={}, keywords={}",
            rules.primary_model(),
            rules.rules().len(),
            rules.keyword_count()
        );
        Self {
            rules,
            log: SessionLog::new(),
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn analyze(&self, task: &str) -> QueryAnalysis {
        delegation::analyze(&self.rules, task)
    }

    pub fn decide(&self, task: &str) -> Decision {
        let decision = delegation::decide_with(&self.rules, self.analyze(task));
        log::info!(
            "Decision for '{}': {} ({}) triggers={}",
            excerpt(task, 50),
            decision.target,
            decision.reason,
            decision.analysis.triggers_summary()
        );
        decision
    }

    /// Process a task and return the human-readable result
    pub fn process(&self, task: &str, input_type: &str) -> String {
        self.process_entry(task, input_type).result
    }

    /// Process a task and return the changelog entry it produced
    pub fn process_entry(&self, task: &str, input_type: &str) -> ChangelogEntry {
        log::info!(
            "Processing {} request at {}",
            input_type,
            Local::now().format("%Y-%m-%d %H:%M:%S")
        );

        let decision = self.decide(task);
        let result = format!("Processed '{}' with delegation to {}", task, decision.target);
        let summary = decision.analysis.triggers_summary();

        self.log.append(NewEntry {
            task,
            input_type,
            delegation_target: &decision.target,
            result: &result,
            query_analysis_summary: &summary,
        })
    }

    pub fn entries(&self) -> Vec<ChangelogEntry> {
        self.log.entries()
    }

    /// Diagnostic listing of every logged decision
    pub fn dump_state(&self) -> String {
        let entries = self.log.entries();
        let mut out = format!("Session memory contains {} entries\n", entries.len());
        for entry in &entries {
            out.push_str(&format!(
                "  {}. Task: {} | Delegation: {} | Time: {}\n",
                entry.session_id,
                excerpt(&entry.task, 50),
                entry.delegation_target,
                entry.timestamp.format("%Y-%m-%d %H:%M:%S")
            ));
        }
        out
    }

    /// Process the canned demo queries in order
    pub fn run_demo(&self) -> Vec<ChangelogEntry> {
        DEMO_QUERIES
            .iter()
            .map(|(task, input_type)| self.process_entry(task, input_type))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delegation::{DecisionReason, Policy, RuleSpec};

    fn spec(keywords: &[&str], target: &str) -> RuleSpec {
        RuleSpec {
            condition: None,
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            delegate_to: target.to_string(),
        }
    }

    fn coordinator() -> Coordinator {
        let rules = RuleSet::new(
            "qwen",
            &[spec(&["code", "debug"], "coder"), spec(&["research", "agi"], "researcher")],
            Policy::default(),
        )
        .unwrap();
        Coordinator::new(rules)
    }

    #[test]
    fn test_process_returns_result_with_task_and_target() {
        let coord = coordinator();
        let result = coord.process("Help me debug this code", DEFAULT_INPUT_TYPE);
        assert!(result.contains("Help me debug this code"));
        assert!(result.contains("coder"));
    }

    #[test]
    fn test_process_logs_every_request() {
        let coord = coordinator();
        coord.process("debug code", "text");
        coord.process("hello", "text");
        coord.process("agi research", "image");

        let entries = coord.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].delegation_target, "coder");
        assert_eq!(entries[0].query_analysis_summary, r#"{"coder":["code","debug"]}"#);
        assert_eq!(entries[1].delegation_target, "qwen");
        assert_eq!(entries[1].query_analysis_summary, "{}");
        assert_eq!(entries[2].delegation_target, "researcher");
        assert_eq!(entries[2].input_type, "image");
        assert_eq!(
            entries.iter().map(|e| e.session_id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_result_matches_logged_entry() {
        let coord = coordinator();
        let result = coord.process("hello", "text");
        assert_eq!(coord.entries()[0].result, result);
    }

    #[test]
    fn test_analyze_does_not_log() {
        let coord = coordinator();
        let analysis = coord.analyze("debug code");
        assert_eq!(analysis.confidence["coder"], 2);
        let decision = coord.decide("debug code");
        assert_eq!(decision.reason, DecisionReason::Delegated);
        assert!(coord.entries().is_empty());
    }

    #[test]
    fn test_dump_state_lists_entries() {
        let coord = coordinator();
        coord.process("debug this code", "text");
        coord.process(&"x".repeat(80), "text");

        let dump = coord.dump_state();
        assert!(dump.starts_with("Session memory contains 2 entries"));
        assert!(dump.contains("1. Task: debug this code | Delegation: coder"));
        assert!(dump.contains(&format!("2. Task: {}... | Delegation: qwen", "x".repeat(50))));
    }

    #[test]
    fn test_demo_processes_all_queries() {
        let coord = coordinator();
        let entries = coord.run_demo();
        assert_eq!(entries.len(), DEMO_QUERIES.len());
        assert_eq!(coord.entries().len(), DEMO_QUERIES.len());
        // "Help me debug this JavaScript code"
        assert_eq!(entries[2].delegation_target, "coder");
        // "How can I optimize my AGI research workflow?"
        assert_eq!(entries[4].delegation_target, "researcher");
        // "Generate a logo for a tech startup"
        assert_eq!(entries[1].delegation_target, "qwen");
    }
}
