use colored::*;
use eyre::Result;

use crate::cli::OutputFormat;
use crate::config::Config;

pub fn run(task: &str, input_type: &str, format: OutputFormat, verbose: bool, config: &Config) -> Result<()> {
    let coordinator = super::coordinator(config)?;

    if verbose && format == OutputFormat::Text {
        let decision = coordinator.decide(task);
        println!("{} {} ({})", "→".blue(), decision.target.cyan(), decision.reason.to_string().dimmed());
        println!("  triggers: {}", decision.analysis.triggers_summary().dimmed());
    }

    let entry = coordinator.process_entry(task, input_type);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&entry)?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(&entry)?);
        }
        OutputFormat::Text => {
            println!("{}", entry.result);
        }
    }

    Ok(())
}
