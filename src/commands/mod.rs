pub mod analyze;
pub mod batch;
pub mod completions;
pub mod demo;
pub mod route;
pub mod rules;

use eyre::Result;

use crate::config::Config;
use crate::coordinator::Coordinator;

/// Build a coordinator from the loaded configuration
pub fn coordinator(config: &Config) -> Result<Coordinator> {
    let rules = config.rule_set()?;
    Ok(Coordinator::new(rules))
}
