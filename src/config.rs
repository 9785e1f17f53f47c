//! Configuration Management
//!
//! Persisted tool settings for ocinfo and resolution of the effective value
//! of each setting (CLI > config file > environment > default). Provider
//! credentials live in the OCI config file and are read by [`crate::oci::auth`].

use crate::inventory::DEFAULT_CONCURRENCY;
use crate::oci::auth::{default_config_path, expand_home, DEFAULT_PROFILE};
use crate::report::render::OutputFormat;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// OCI config-file profile
    #[serde(default)]
    pub profile: Option<String>,
    /// Path to the OCI config file
    #[serde(default)]
    pub config_file: Option<String>,
    /// Region overriding the profile's own
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub concurrency: Option<usize>,
    #[serde(default)]
    pub output: Option<OutputFormat>,
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ocinfo").join("config.json"))
    }

    /// Load configuration from disk, falling back to defaults
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring invalid config {}: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path().context("No user config directory available")?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        Ok(())
    }

    /// Get effective profile (CLI > config > OCI_CLI_PROFILE > DEFAULT)
    pub fn effective_profile(&self, cli: Option<&str>) -> String {
        cli.map(str::to_string)
            .or_else(|| self.profile.clone())
            .or_else(|| env_var("OCI_CLI_PROFILE"))
            .unwrap_or_else(|| DEFAULT_PROFILE.to_string())
    }

    /// Get effective OCI config file (CLI > config > OCI_CLI_CONFIG_FILE > ~/.oci/config)
    pub fn effective_config_file(&self, cli: Option<&Path>) -> PathBuf {
        cli.map(Path::to_path_buf)
            .or_else(|| self.config_file.as_deref().map(expand_home))
            .unwrap_or_else(default_config_path)
    }

    /// Get effective region override (CLI > config > OCI_CLI_REGION).
    /// `None` keeps the profile's region.
    pub fn effective_region(&self, cli: Option<&str>) -> Option<String> {
        cli.map(str::to_string)
            .or_else(|| self.region.clone())
            .or_else(|| env_var("OCI_CLI_REGION"))
    }

    pub fn effective_concurrency(&self, cli: Option<usize>) -> usize {
        cli.or(self.concurrency)
            .unwrap_or(DEFAULT_CONCURRENCY)
            .max(1)
    }

    pub fn effective_output(&self, cli: Option<OutputFormat>) -> OutputFormat {
        cli.or(self.output).unwrap_or_default()
    }
}
