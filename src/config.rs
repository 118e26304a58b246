//! Generator configuration
//!
//! Settings are resolved in order: built-in defaults, an optional JSON file,
//! `LOG_LEVEL` / `DASHGEN_*` environment variables, then CLI flags.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn, Level};

use crate::constants::generator::{DEFAULT_LOG_LEVEL, ENV_PREFIX, LOG_LEVEL_ENV};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Number panels lacking an id
    #[serde(default = "default_enabled")]
    pub auto_panel_ids: bool,

    /// Label targets lacking a refId, panel by panel
    #[serde(default = "default_enabled")]
    pub auto_ref_ids: bool,

    /// Expand `#<refId>` references in target expressions
    #[serde(default = "default_enabled")]
    pub resolve_expressions: bool,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_enabled() -> bool {
    true
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            auto_panel_ids: default_enabled(),
            auto_ref_ids: default_enabled(),
            resolve_expressions: default_enabled(),
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl GeneratorConfig {
    /// Load a JSON config file; keys left out keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: GeneratorConfig = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse JSON config from {:?}", path))?;
        info!(path = %path.display(), "Loaded generator config");
        Ok(config)
    }

    /// Defaults, overlaid with the optional file and then the process environment
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply overrides found through `lookup`; unparsable values are ignored
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(level) = lookup(LOG_LEVEL_ENV) {
            self.log_level = level.to_lowercase();
        }

        let flags: [(&str, &mut bool); 3] = [
            ("AUTO_PANEL_IDS", &mut self.auto_panel_ids),
            ("AUTO_REF_IDS", &mut self.auto_ref_ids),
            ("RESOLVE_EXPRESSIONS", &mut self.resolve_expressions),
        ];
        for (suffix, slot) in flags {
            let key = format!("{ENV_PREFIX}{suffix}");
            let Some(raw) = lookup(&key) else {
                continue;
            };
            match parse_flag(&raw) {
                Some(value) => *slot = value,
                None => warn!(key = %key, value = %raw, "Ignoring unparsable boolean override"),
            }
        }
    }

    /// Tracing level for `log_level`, falling back to info
    pub fn trace_level(&self) -> Level {
        match self.log_level.as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}
