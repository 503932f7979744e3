use colored::*;
use eyre::Result;

use crate::cli::OutputFormat;
use crate::config::Config;

pub fn run(task: &str, format: OutputFormat, config: &Config) -> Result<()> {
    let coordinator = super::coordinator(config)?;
    let decision = coordinator.decide(task);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&decision)?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(&decision)?);
        }
        OutputFormat::Text => {
            println!("{} {}", "Task:".bold(), task);
            println!();

            if !decision.analysis.has_matches() {
                println!("  {}", "(no delegation triggers)".dimmed());
            }
            for (target, keywords) in &decision.analysis.triggers {
                let confidence = decision.analysis.confidence.get(target).copied().unwrap_or(0);
                println!("  {:15} {} [{}]", target.cyan(), confidence, keywords.join(", ").dimmed());
            }

            println!();
            println!(
                "  native handling suggested: {}",
                if decision.analysis.native_handling_suggested { "yes".yellow() } else { "no".normal() }
            );
            println!(
                "  {} {} ({})",
                "decision:".bold(),
                decision.target.green(),
                decision.reason.to_string().dimmed()
            );
        }
    }

    Ok(())
}
