//! Delegation decision policy

use serde::{Deserialize, Serialize};

use super::analyzer::QueryAnalysis;
use super::rules::RuleSet;

/// Why a target was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    /// A rule target had the highest confidence
    Delegated,
    /// Nothing matched and the task looks like something the primary model handles itself
    NativeHandling,
    /// Nothing matched, or the candidate failed revalidation
    Default,
}

impl std::fmt::Display for DecisionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DecisionReason::Delegated => "delegated",
            DecisionReason::NativeHandling => "native handling",
            DecisionReason::Default => "default",
        };
        write!(f, "{}", s)
    }
}

/// Outcome of a delegation decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub target: String,
    pub reason: DecisionReason,
    pub analysis: QueryAnalysis,
}

/// Pick a target for an analyzed task
pub fn decide_with(rules: &RuleSet, analysis: QueryAnalysis) -> Decision {
    if let Some(candidate) = select_candidate(&analysis).map(str::to_string) {
        if is_backed_by_rule(rules, &analysis, &candidate) {
            log::debug!("Delegating to {}", candidate);
            return Decision {
                target: candidate,
                reason: DecisionReason::Delegated,
                analysis,
            };
        }
        log::warn!("Candidate {} failed revalidation, falling back to primary", candidate);
    } else if analysis.native_handling_suggested {
        // Same target as the default path; only the reason differs.
        log::debug!("Native handling suggested, keeping on {}", rules.primary_model());
        return Decision {
            target: rules.primary_model().to_string(),
            reason: DecisionReason::NativeHandling,
            analysis,
        };
    }

    log::debug!("No delegation trigger, defaulting to {}", rules.primary_model());
    Decision {
        target: rules.primary_model().to_string(),
        reason: DecisionReason::Default,
        analysis,
    }
}

/// Target with strictly greatest positive confidence; ties go to the first seen
fn select_candidate(analysis: &QueryAnalysis) -> Option<&str> {
    let mut best: Option<(&str, usize)> = None;
    for (target, &count) in &analysis.confidence {
        let threshold = best.map(|(_, c)| c).unwrap_or(0);
        if count > threshold {
            best = Some((target.as_str(), count));
        }
    }
    best.map(|(target, _)| target)
}

/// Some rule's target must be contained in the candidate, and the candidate must have triggers
fn is_backed_by_rule(rules: &RuleSet, analysis: &QueryAnalysis, candidate: &str) -> bool {
    rules
        .rules()
        .iter()
        .any(|rule| candidate.contains(rule.delegate_to.as_str()) && analysis.triggers.contains_key(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delegation::analyzer::analyze;
    use crate::delegation::rules::{Policy, RuleSpec};
    use indexmap::IndexMap;

    fn decide(rules: &RuleSet, task: &str) -> Decision {
        decide_with(rules, analyze(rules, task))
    }

    fn spec(keywords: &[&str], target: &str) -> RuleSpec {
        RuleSpec {
            condition: None,
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            delegate_to: target.to_string(),
        }
    }

    fn sample_rules() -> RuleSet {
        RuleSet::new(
            "qwen",
            &[spec(&["code", "debug"], "coder"), spec(&["research", "agi"], "researcher")],
            Policy::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_decide_examples() {
        let rules = sample_rules();
        assert_eq!(decide(&rules, "Help me debug this code").target, "coder");
        assert_eq!(decide(&rules, "What is AGI research").target, "researcher");
        assert_eq!(decide(&rules, "hello").target, "qwen");
    }

    #[test]
    fn test_delegation_beats_native_hint() {
        let decision = decide(&sample_rules(), "how to explain AGI research");
        assert!(decision.analysis.native_handling_suggested);
        assert_eq!(decision.target, "researcher");
        assert_eq!(decision.reason, DecisionReason::Delegated);
    }

    #[test]
    fn test_native_hint_resolves_to_primary() {
        let rules = sample_rules();
        let native = decide(&rules, "please summarize the meeting");
        let plain = decide(&rules, "hello there");
        assert_eq!(native.target, plain.target);
        assert_eq!(native.reason, DecisionReason::NativeHandling);
        assert_eq!(plain.reason, DecisionReason::Default);
    }

    #[test]
    fn test_tie_goes_to_first_rule() {
        let decision = decide(&sample_rules(), "code for agi");
        assert_eq!(decision.analysis.confidence["coder"], 1);
        assert_eq!(decision.analysis.confidence["researcher"], 1);
        assert_eq!(decision.target, "coder");
    }

    #[test]
    fn test_highest_confidence_wins_regardless_of_order() {
        let decision = decide(&sample_rules(), "code for agi research");
        assert_eq!(decision.target, "researcher");
    }

    #[test]
    fn test_single_positive_target_is_chosen() {
        let rules = sample_rules();
        for task in ["debug it", "some code", "research only", "agi"] {
            let decision = decide(&rules, task);
            assert_eq!(decision.analysis.confidence.len(), 1);
            let (only, _) = decision.analysis.confidence.first().unwrap();
            assert_eq!(&decision.target, only);
        }
    }

    #[test]
    fn test_empty_task_is_default() {
        let decision = decide(&sample_rules(), "");
        assert_eq!(decision.target, "qwen");
        assert_eq!(decision.reason, DecisionReason::Default);
    }

    #[test]
    fn test_unbacked_candidate_falls_back() {
        let rules = sample_rules();
        let mut triggers = IndexMap::new();
        triggers.insert("painter".to_string(), vec!["draw".to_string()]);
        let mut confidence = IndexMap::new();
        confidence.insert("painter".to_string(), 1);
        let analysis = QueryAnalysis {
            query: "draw".to_string(),
            triggers,
            confidence,
            native_handling_suggested: false,
        };
        let decision = decide_with(&rules, analysis);
        assert_eq!(decision.target, "qwen");
        assert_eq!(decision.reason, DecisionReason::Default);
    }

    #[test]
    fn test_zero_confidence_is_never_selected() {
        let rules = sample_rules();
        let mut confidence = IndexMap::new();
        confidence.insert("coder".to_string(), 0);
        let analysis = QueryAnalysis {
            query: String::new(),
            triggers: IndexMap::new(),
            confidence,
            native_handling_suggested: false,
        };
        assert_eq!(decide_with(&rules, analysis).target, "qwen");
    }

    #[test]
    fn test_reason_display() {
        assert_eq!(DecisionReason::NativeHandling.to_string(), "native handling");
    }
}
