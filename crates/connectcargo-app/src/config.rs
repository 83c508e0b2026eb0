//! Configuration management for connectcargo
//!
//! Config stored at: ~/.config/connectcargo/config.json

use std::path::PathBuf;
use std::time::Duration;

use connectcargo_types::{ConfigError, OutputFormat, Result};
use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Default output format (json, table)
    #[serde(default = "default_output_format")]
    pub output_format: OutputFormat,

    /// Data directory override (favorites, reminders, reports)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Records per list page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Simulated backend latency in milliseconds
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,

    /// Probability (0.0 - 1.0) that a simulated backend call fails
    #[serde(default = "default_failure_rate")]
    pub failure_rate: f64,

    /// Search input debounce in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Toasts that may wait behind the visible one
    #[serde(default = "default_toast_capacity")]
    pub toast_capacity: usize,
}

fn default_output_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_page_size() -> usize {
    10
}

fn default_latency_ms() -> u64 {
    2000
}

fn default_failure_rate() -> f64 {
    0.1
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_toast_capacity() -> usize {
    16
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_format: default_output_format(),
            data_dir: None,
            page_size: default_page_size(),
            latency_ms: default_latency_ms(),
            failure_rate: default_failure_rate(),
            debounce_ms: default_debounce_ms(),
            toast_capacity: default_toast_capacity(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join("connectcargo");
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Get the data directory path
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }

        let data_dir = dirs::data_dir()
            .ok_or(ConfigError::NotFound)?
            .join("connectcargo");
        Ok(data_dir)
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Reject values the services cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "page_size",
                reason: "must be at least 1".to_string(),
            }
            .into());
        }
        if !(0.0..=1.0).contains(&self.failure_rate) {
            return Err(ConfigError::InvalidValue {
                key: "failure_rate",
                reason: format!("{} is outside 0.0 - 1.0", self.failure_rate),
            }
            .into());
        }
        if self.toast_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                key: "toast_capacity",
                reason: "must be at least 1".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = serde_json::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        self.validate()?;
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(())
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "ConnectCargo Configuration")?;
        writeln!(f, "==========================")?;
        writeln!(f)?;
        writeln!(f, "Output format:  {}", self.output_format)?;
        writeln!(
            f,
            "Data dir:       {}",
            self.data_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "(error)".to_string())
        )?;
        writeln!(f, "Page size:      {}", self.page_size)?;
        writeln!(f, "Latency:        {} ms", self.latency_ms)?;
        writeln!(f, "Failure rate:   {}", self.failure_rate)?;
        writeln!(f, "Debounce:       {} ms", self.debounce_ms)?;
        writeln!(f, "Toast capacity: {}", self.toast_capacity)?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:    {}", path.display())?;
        }

        Ok(())
    }
}
