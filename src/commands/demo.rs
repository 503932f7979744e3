use colored::*;
use eyre::Result;

use crate::cli::OutputFormat;
use crate::config::Config;

pub fn run(quiet: bool, config: &Config) -> Result<()> {
    let coordinator = super::coordinator(config)?;

    if !quiet {
        println!("{}", "Delegation demo".bold());
        println!(
            "  primary: {}, rules: {}",
            coordinator.rules().primary_model().cyan(),
            coordinator.rules().rules().len()
        );
        println!();
    }

    for entry in coordinator.run_demo() {
        if !quiet {
            println!("{} {}", "→".blue(), entry.result);
        }
    }

    super::batch::print_session(&coordinator, OutputFormat::Text)
}
