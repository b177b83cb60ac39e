//! Configuration types for the sensor dashboard

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Environment variable that overrides the sensor endpoint URL
pub const API_URL_ENV: &str = "SENSOR_API_URL";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

impl Config {
    /// Replace the source URL with the value of `SENSOR_API_URL`, if one was set
    pub fn apply_env_url(&mut self, value: Option<String>) {
        if let Some(url) = value.filter(|u| !u.trim().is_empty()) {
            tracing::debug!("Using sensor endpoint from {}: {}", API_URL_ENV, url);
            self.source.url = url;
        }
    }

    pub fn validate(&self) -> crate::Result<()> {
        if self.source.url.trim().is_empty() {
            return Err(crate::DashboardError::Config(
                "source.url must not be empty".to_string(),
            ));
        }
        if self.polling.interval_ms == 0 {
            return Err(crate::DashboardError::InvalidInterval(0));
        }
        Ok(())
    }
}

/// Where readings are fetched from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
        }
    }
}

/// Dashboard configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_dashboard_port")]
    pub port: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bind_address: default_bind_address(),
            port: default_dashboard_port(),
        }
    }
}

/// Refresh periods offered by the dashboard's interval selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub enum RefreshInterval {
    FiveSeconds,
    TenSeconds,
    ThirtySeconds,
    OneMinute,
}

impl RefreshInterval {
    pub const ALL: [RefreshInterval; 4] = [
        RefreshInterval::FiveSeconds,
        RefreshInterval::TenSeconds,
        RefreshInterval::ThirtySeconds,
        RefreshInterval::OneMinute,
    ];

    pub fn as_millis(self) -> u64 {
        match self {
            RefreshInterval::FiveSeconds => 5_000,
            RefreshInterval::TenSeconds => 10_000,
            RefreshInterval::ThirtySeconds => 30_000,
            RefreshInterval::OneMinute => 60_000,
        }
    }

    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.as_millis())
    }
}

impl fmt::Display for RefreshInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefreshInterval::FiveSeconds => write!(f, "5 seconds"),
            RefreshInterval::TenSeconds => write!(f, "10 seconds"),
            RefreshInterval::ThirtySeconds => write!(f, "30 seconds"),
            RefreshInterval::OneMinute => write!(f, "1 minute"),
        }
    }
}

impl TryFrom<u64> for RefreshInterval {
    type Error = crate::DashboardError;

    fn try_from(ms: u64) -> Result<Self, Self::Error> {
        RefreshInterval::ALL
            .into_iter()
            .find(|i| i.as_millis() == ms)
            .ok_or(crate::DashboardError::InvalidInterval(ms))
    }
}

impl From<RefreshInterval> for u64 {
    fn from(interval: RefreshInterval) -> Self {
        interval.as_millis()
    }
}

fn default_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_interval_ms() -> u64 {
    RefreshInterval::FiveSeconds.as_millis()
}

fn default_true() -> bool {
    true
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_dashboard_port() -> u16 {
    11120
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}
