//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Project-local config file, looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = ".mcp-risk.yaml";

/// mcp-risk configuration with layered hierarchy
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the country risk reference CSV
    pub reference: Option<PathBuf>,

    /// Default output format
    pub default_format: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/mcp-risk/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // 3. Project config (./.mcp-risk.yaml)
        if let Some(project) = Self::read_file(Path::new(PROJECT_CONFIG_FILE)) {
            config.merge(project);
        }

        // 4. Environment variables
        config.apply_env(|key| std::env::var(key).ok());

        config
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "mcp-risk")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Read a config file, ignoring missing or unparsable files
    fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), "ignoring invalid config file: {}", e);
                None
            }
        }
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(reference) = var("MCP_RISK_REFERENCE").filter(|v| !v.is_empty()) {
            self.reference = Some(PathBuf::from(reference));
        }
        if let Some(format) = var("MCP_RISK_FORMAT").filter(|v| !v.is_empty()) {
            self.default_format = Some(format);
        }
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.reference.is_some() {
            self.reference = other.reference;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
    }
}
