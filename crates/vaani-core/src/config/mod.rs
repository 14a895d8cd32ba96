//! Configuration system for vaani.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

use crate::error::{VaaniError, VaaniResult};
use crate::events::DEFAULT_POLL_INTERVAL_SECS;
use crate::nlu::{Taxonomy, DEFAULT_CONFIDENCE_THRESHOLD};

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "VAANI_";

/// Main configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaaniConfig {
    /// JSON file holding scheduled events.
    pub store_path: PathBuf,
    /// Seconds between timekeeper polls.
    pub poll_interval_secs: u64,
    /// Minimum similarity (0–100) for a segment to resolve.
    pub confidence_threshold: f64,
    /// Taxonomy file (TOML, JSON or YAML). Built-in taxonomy when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taxonomy_path: Option<PathBuf>,
    /// Run the background timekeeper.
    pub enable_timekeeper: bool,
}

impl Default for VaaniConfig {
    fn default() -> Self {
        let vaani_dir = dirs::home_dir()
            .map(|h| h.join(".vaani"))
            .unwrap_or_else(|| PathBuf::from(".vaani"));

        Self {
            store_path: vaani_dir.join("events.json"),
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            taxonomy_path: None,
            enable_timekeeper: true,
        }
    }
}

impl VaaniConfig {
    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<Path>) -> VaaniResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        let config: Self = match ext {
            Some("toml") => toml::from_str(&content).map_err(|e| VaaniError::config(e.to_string()))?,
            Some("json") => {
                serde_json::from_str(&content).map_err(|e| VaaniError::config(e.to_string()))?
            }
            Some("yaml" | "yml") => {
                serde_yaml::from_str(&content).map_err(|e| VaaniError::config(e.to_string()))?
            }
            _ => {
                return Err(VaaniError::config(
                    "Unsupported config file format. Use .toml, .json, or .yaml",
                ))
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `VAANI_*` environment variables over defaults.
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Apply `VAANI_*` pairs over defaults. Unparseable values are skipped
    /// with a warning.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();

        for (key, value) in vars {
            let Some(name) = key.as_ref().strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let value = value.as_ref().trim();

            match name {
                "STORE_PATH" => config.store_path = PathBuf::from(value),
                "TAXONOMY_PATH" if value.is_empty() => config.taxonomy_path = None,
                "TAXONOMY_PATH" => config.taxonomy_path = Some(PathBuf::from(value)),
                "POLL_INTERVAL_SECS" => match value.parse() {
                    Ok(secs) => config.poll_interval_secs = secs,
                    Err(_) => warn!(value, "Ignoring invalid VAANI_POLL_INTERVAL_SECS"),
                },
                "CONFIDENCE_THRESHOLD" => match value.parse() {
                    Ok(threshold) => config.confidence_threshold = threshold,
                    Err(_) => warn!(value, "Ignoring invalid VAANI_CONFIDENCE_THRESHOLD"),
                },
                "ENABLE_TIMEKEEPER" => match parse_bool(value) {
                    Some(enabled) => config.enable_timekeeper = enabled,
                    None => warn!(value, "Ignoring invalid VAANI_ENABLE_TIMEKEEPER"),
                },
                _ => {}
            }
        }

        config
    }

    /// Build configuration using builder pattern.
    pub fn builder() -> VaaniConfigBuilder {
        VaaniConfigBuilder::default()
    }

    /// Reject values the runtime cannot work with.
    pub fn validate(&self) -> VaaniResult<()> {
        if !(0.0..=100.0).contains(&self.confidence_threshold) {
            return Err(VaaniError::config(format!(
                "confidence_threshold must be within 0-100, got {}",
                self.confidence_threshold
            )));
        }
        if self.poll_interval_secs == 0 {
            return Err(VaaniError::config("poll_interval_secs must be at least 1"));
        }
        if self.store_path.as_os_str().is_empty() {
            return Err(VaaniError::config("store_path must not be empty"));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// The configured taxonomy file, or the built-in taxonomy.
    pub fn load_taxonomy(&self) -> VaaniResult<Taxonomy> {
        match &self.taxonomy_path {
            Some(path) => Taxonomy::from_file(path),
            None => Ok(Taxonomy::builtin()),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Builder for VaaniConfig.
#[derive(Default)]
pub struct VaaniConfigBuilder {
    config: VaaniConfig,
}

impl VaaniConfigBuilder {
    /// Set the event store file.
    pub fn store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.store_path = path.into();
        self
    }

    /// Set the poll interval in seconds.
    pub fn poll_interval_secs(mut self, secs: u64) -> Self {
        self.config.poll_interval_secs = secs;
        self
    }

    /// Set the confidence threshold.
    pub fn confidence_threshold(mut self, threshold: f64) -> Self {
        self.config.confidence_threshold = threshold;
        self
    }

    /// Load the taxonomy from a file instead of the built-in one.
    pub fn taxonomy_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.taxonomy_path = Some(path.into());
        self
    }

    pub fn enable_timekeeper(mut self, enabled: bool) -> Self {
        self.config.enable_timekeeper = enabled;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> VaaniConfig {
        self.config
    }
}
