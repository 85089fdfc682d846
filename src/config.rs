//! TOML configuration for razer-battery

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use razer_transport::catalog::{builtin_devices, builtin_families};
use razer_transport::protocol::timing;
use razer_transport::{
    Catalog, DeviceDescriptor, FamilyGroup, FlowConfig, PLATFORM_USAGE_SUBDIVIDED,
};
use serde::{Deserialize, Serialize};

/// Exchange retry settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_tries: usize,
    pub retry_delay_ms: u64,
    pub settle_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_tries: timing::MAX_TRIES,
            retry_delay_ms: timing::RETRY_DELAY_MS,
            settle_delay_ms: timing::SETTLE_DELAY_MS,
        }
    }
}

impl From<RetryConfig> for FlowConfig {
    fn from(retry: RetryConfig) -> Self {
        FlowConfig {
            max_tries: retry.max_tries,
            retry_delay: Duration::from_millis(retry.retry_delay_ms),
            settle_delay: Duration::from_millis(retry.settle_delay_ms),
        }
    }
}

/// Complete configuration file
///
/// Omitted `devices` or `families` fall back to the built-in tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Override the platform's usage subdivision behaviour
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_subdivided: Option<bool>,
    pub retry: RetryConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub families: Option<Vec<FamilyGroup>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub devices: Option<Vec<DeviceDescriptor>>,
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("razer-battery")
            .join("config.toml")
    }

    /// Load config from a file, or return default if not found
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Device catalog with built-in fallbacks for omitted sections
    pub fn catalog(&self) -> Catalog {
        Catalog::new(
            self.devices.clone().unwrap_or_else(builtin_devices),
            self.families.clone().unwrap_or_else(builtin_families),
        )
    }

    pub fn flow_config(&self) -> FlowConfig {
        self.retry.into()
    }

    pub fn usage_subdivided(&self) -> bool {
        self.usage_subdivided.unwrap_or(PLATFORM_USAGE_SUBDIVIDED)
    }
}
