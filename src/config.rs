use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::delegation::{Policy, RuleSet, RuleSpec};

/// Log level for the delegator log file
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Off => log::LevelFilter::Off,
        }
    }
}

/// Main delegator configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub log_level: LogLevel,
    /// Always-available default target
    pub primary_model: String,
    /// Ordered delegation rules; order decides ties and overwrites
    pub delegation_rules: Vec<RuleSpec>,
    #[serde(default)]
    pub policy: Policy,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, it must load
        if let Some(path) = config_path {
            let path = Self::expand_path(path);
            return Self::load_from_file(&path).context(format!("Failed to load config from {}", path.display()));
        }

        let candidates = Self::candidate_paths();
        for path in &candidates {
            if path.exists() {
                return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
            }
        }

        let searched: Vec<String> = candidates.iter().map(|p| p.display().to_string()).collect();
        eyre::bail!("No delegator config found (searched: {})", searched.join(", "))
    }

    /// Discovery chain, in priority order
    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(env_path) = std::env::var("DELEGATOR_CONFIG") {
            paths.push(Self::expand_path(Path::new(&env_path)));
        }

        if let Ok(dir) = std::env::var("DELEGATOR_DIR") {
            paths.push(Self::expand_path(Path::new(&dir)).join("delegator.yaml"));
        }

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("delegator").join("delegator.yaml"));
        }

        // For development
        paths.push(PathBuf::from("delegator.yaml"));
        paths
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let config = Self::from_yaml(&content)?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content).context("Failed to parse config file")?;
        // Reject malformed rules at load time, not at first match
        config.rule_set()?;
        Ok(config)
    }

    /// Build the compiled rule set
    pub fn rule_set(&self) -> Result<RuleSet> {
        RuleSet::new(&self.primary_model, &self.delegation_rules, self.policy).context("Invalid delegation rules")
    }

    /// Expand a path that may contain ~ or env vars
    pub fn expand_path(path: &Path) -> PathBuf {
        let path_str = path.to_string_lossy();
        let expanded = shellexpand::full(&path_str).unwrap_or_else(|_| path_str.clone());
        PathBuf::from(expanded.as_ref())
    }
}
