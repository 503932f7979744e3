//! Keyword-based task delegation
//!
//! A task is matched against an ordered set of rules. Each rule maps a set of
//! keywords to a target handler; the target with the most whole-word keyword
//! matches wins. Anything unmatched stays on the primary model.

pub mod analyzer;
pub mod decider;
pub mod rules;

pub use analyzer::{QueryAnalysis, analyze};
pub use decider::{Decision, DecisionReason, decide_with};
pub use rules::{Policy, RuleSet, RuleSpec};
