use colored::*;
use eyre::Result;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::config::Config;
use crate::delegation::{Policy, RuleSpec};

#[derive(Serialize)]
struct RulesView {
    primary_model: String,
    policy: Policy,
    delegation_rules: Vec<RuleSpec>,
}

pub fn run(format: OutputFormat, config: &Config) -> Result<()> {
    let rules = config.rule_set()?;
    let view = RulesView {
        primary_model: rules.primary_model().to_string(),
        policy: rules.policy(),
        delegation_rules: rules.rules().iter().map(|r| r.to_spec()).collect(),
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(&view)?);
        }
        OutputFormat::Text => {
            println!("{} {}", "Primary model:".bold(), view.primary_model.green());
            println!(
                "{} merge_shared_targets={}",
                "Policy:".bold(),
                view.policy.merge_shared_targets
            );
            println!("{} {}", "Targets:".bold(), rules.targets().join(", "));
            println!();
            println!("{} ({}):", "Delegation rules".bold(), view.delegation_rules.len());

            for (i, rule) in view.delegation_rules.iter().enumerate() {
                let label = rule.condition.as_deref().unwrap_or("");
                println!("  {}. {:15} {}", i + 1, rule.delegate_to.cyan(), label.dimmed());
                println!("     {}", rule.keywords.join(", "));
            }
        }
    }

    Ok(())
}
