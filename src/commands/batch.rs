use colored::*;
use eyre::{Context, Result};
use std::fs;
use std::io::{self, Read};
use std::path::Path;

use crate::cli::OutputFormat;
use crate::config::Config;
use crate::coordinator::Coordinator;

pub fn run(file: Option<&Path>, input_type: &str, format: OutputFormat, quiet: bool, config: &Config) -> Result<()> {
    let content = match file {
        Some(path) => fs::read_to_string(path).with_context(|| format!("Failed to read tasks from {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).context("Failed to read tasks from stdin")?;
            buf
        }
    };

    let coordinator = super::coordinator(config)?;
    let tasks = task_lines(&content);
    log::info!("Batch processing {} tasks", tasks.len());

    for task in tasks {
        let result = coordinator.process(task, input_type);
        if !quiet && format == OutputFormat::Text {
            println!("{} {}", "→".blue(), result);
        }
    }

    print_session(&coordinator, format)
}

/// Print the coordinator's session log in the requested format
pub fn print_session(coordinator: &Coordinator, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&coordinator.entries())?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(&coordinator.entries())?);
        }
        OutputFormat::Text => {
            println!();
            print!("{}", coordinator.dump_state());
        }
    }
    Ok(())
}

/// Non-blank, trimmed lines
fn task_lines(content: &str) -> Vec<&str> {
    content.lines().map(str::trim).filter(|line| !line.is_empty()).collect()
}
