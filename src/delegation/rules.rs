//! Delegation rule set
//!
//! Rules are parsed from configuration once, validated, and compiled into
//! word-boundary matchers. After that the set is read-only.

use eyre::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A delegation rule as written in the config file
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RuleSpec {
    /// Free-text label describing when the rule applies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    pub keywords: Vec<String>,
    pub delegate_to: String,
}

/// How analysis treats rules that share a target
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Policy {
    /// Accumulate matches across rules sharing a `delegate_to`.
    /// When false the last matching rule for a target replaces earlier ones.
    pub merge_shared_targets: bool,
}

/// A keyword with its precompiled whole-word matcher
#[derive(Debug, Clone)]
pub struct Keyword {
    text: String,
    matcher: Regex,
}

impl Keyword {
    fn compile(text: &str) -> Result<Self> {
        let pattern = format!(r"\b{}\b", regex::escape(&text.to_lowercase()));
        let matcher = Regex::new(&pattern).with_context(|| format!("Failed to compile keyword matcher for '{}'", text))?;
        Ok(Self {
            text: text.to_string(),
            matcher,
        })
    }

    /// Keyword as configured (original casing)
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Test against an already lower-cased task
    pub fn is_match(&self, task_lower: &str) -> bool {
        self.matcher.is_match(task_lower)
    }
}

/// A validated, compiled delegation rule
#[derive(Debug, Clone)]
pub struct DelegationRule {
    pub condition: Option<String>,
    pub keywords: Vec<Keyword>,
    pub delegate_to: String,
}

impl DelegationRule {
    fn from_spec(index: usize, spec: &RuleSpec) -> Result<Self> {
        if spec.delegate_to.trim().is_empty() {
            eyre::bail!("Delegation rule #{} has an empty delegate_to", index + 1);
        }
        if spec.keywords.is_empty() {
            eyre::bail!("Delegation rule #{} ({}) has no keywords", index + 1, spec.delegate_to);
        }

        let mut keywords = Vec::with_capacity(spec.keywords.len());
        for keyword in &spec.keywords {
            if keyword.trim().is_empty() {
                eyre::bail!("Delegation rule #{} ({}) has a blank keyword", index + 1, spec.delegate_to);
            }
            keywords.push(Keyword::compile(keyword)?);
        }

        Ok(Self {
            condition: spec.condition.clone(),
            keywords,
            delegate_to: spec.delegate_to.clone(),
        })
    }

    /// Keywords of this rule found as whole words in `task_lower`, in rule order
    pub fn matches(&self, task_lower: &str) -> Vec<String> {
        self.keywords
            .iter()
            .filter(|kw| kw.is_match(task_lower))
            .map(|kw| kw.as_str().to_string())
            .collect()
    }

    pub fn to_spec(&self) -> RuleSpec {
        RuleSpec {
            condition: self.condition.clone(),
            keywords: self.keywords.iter().map(|kw| kw.as_str().to_string()).collect(),
            delegate_to: self.delegate_to.clone(),
        }
    }
}

/// Ordered rules plus the default target
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<DelegationRule>,
    primary_model: String,
    policy: Policy,
}

impl RuleSet {
    /// Validate and compile raw rules. Any malformed rule rejects the whole set.
    pub fn new(primary_model: &str, specs: &[RuleSpec], policy: Policy) -> Result<Self> {
        if primary_model.trim().is_empty() {
            eyre::bail!("primary_model must not be empty");
        }

        let rules = specs
            .iter()
            .enumerate()
            .map(|(i, spec)| DelegationRule::from_spec(i, spec))
            .collect::<Result<Vec<_>>>()?;

        log::debug!("Compiled {} delegation rules (primary: {})", rules.len(), primary_model);

        Ok(Self {
            rules,
            primary_model: primary_model.to_string(),
            policy,
        })
    }

    pub fn rules(&self) -> &[DelegationRule] {
        &self.rules
    }

    pub fn primary_model(&self) -> &str {
        &self.primary_model
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Distinct targets in first-seen rule order
    pub fn targets(&self) -> Vec<&str> {
        let mut targets: Vec<&str> = Vec::new();
        for rule in &self.rules {
            if !targets.contains(&rule.delegate_to.as_str()) {
                targets.push(&rule.delegate_to);
            }
        }
        targets
    }

    pub fn keyword_count(&self) -> usize {
        self.rules.iter().map(|r| r.keywords.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(keywords: &[&str], target: &str) -> RuleSpec {
        RuleSpec {
            condition: None,
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            delegate_to: target.to_string(),
        }
    }

    #[test]
    fn test_keyword_whole_word_only() {
        let kw = Keyword::compile("program").unwrap();
        assert!(kw.is_match("write a program please"));
        assert!(!kw.is_match("i love programming"));
    }

    #[test]
    fn test_keyword_escapes_metacharacters() {
        let kw = Keyword::compile("node.js").unwrap();
        assert!(kw.is_match("help with node.js"));
        assert!(!kw.is_match("help with nodexjs"));
    }

    #[test]
    fn test_keyword_lowercased_at_compile() {
        let kw = Keyword::compile("AGI").unwrap();
        assert!(kw.is_match("what is agi research"));
        assert_eq!(kw.as_str(), "AGI");
    }

    #[test]
    fn test_rejects_empty_primary() {
        let err = RuleSet::new("  ", &[], Policy::default()).unwrap_err();
        assert!(err.to_string().contains("primary_model"));
    }

    #[test]
    fn test_rejects_empty_target() {
        let result = RuleSet::new("qwen", &[spec(&["code"], "")], Policy::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_empty_keywords() {
        let result = RuleSet::new("qwen", &[spec(&[], "coder")], Policy::default());
        assert!(result.unwrap_err().to_string().contains("no keywords"));
    }

    #[test]
    fn test_rejects_blank_keyword() {
        let result = RuleSet::new("qwen", &[spec(&["code", " "], "coder")], Policy::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_targets_first_seen_order() {
        let rules = RuleSet::new(
            "qwen",
            &[spec(&["a"], "x"), spec(&["b"], "y"), spec(&["c"], "x")],
            Policy::default(),
        )
        .unwrap();
        assert_eq!(rules.targets(), vec!["x", "y"]);
        assert_eq!(rules.keyword_count(), 3);
    }

    #[test]
    fn test_rule_spec_deserialize_without_condition() {
        let yaml = "keywords: [code, debug]\ndelegate_to: coder\n";
        let parsed: RuleSpec = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(parsed, spec(&["code", "debug"], "coder"));
    }

    #[test]
    fn test_rule_spec_missing_delegate_to_fails() {
        let yaml = "keywords: [code]\n";
        assert!(serde_yaml::from_str::<RuleSpec>(yaml).is_err());
    }
}
