// SPDX-License-Identifier: GPL-3.0-only

//! Service configuration, TOML on disk.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use drivewatch_contracts::{HealthError, HealthErrorKind};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServiceConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
    #[serde(default)]
    pub evaluator: EvaluatorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding the per-device metric segments
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Endpoint URIs to fan alerts out to
    #[serde(default)]
    pub urls: Vec<String>,

    /// Per-endpoint send budget, seconds
    #[serde(default = "default_endpoint_timeout")]
    pub endpoint_timeout_secs: u64,

    /// Overall budget for one dispatch, seconds
    #[serde(default = "default_dispatch_timeout")]
    pub dispatch_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluatorConfig {
    /// Snapshots the trend rule looks back over
    #[serde(default = "default_trend_window")]
    pub trend_window: usize,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_endpoint_timeout() -> u64 {
    10
}

fn default_dispatch_timeout() -> u64 {
    30
}

fn default_trend_window() -> usize {
    crate::evaluate::DEFAULT_TREND_WINDOW
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            urls: Vec::new(),
            endpoint_timeout_secs: default_endpoint_timeout(),
            dispatch_timeout_secs: default_dispatch_timeout(),
        }
    }
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            trend_window: default_trend_window(),
        }
    }
}

impl NotifyConfig {
    pub fn endpoint_timeout(&self) -> Duration {
        Duration::from_secs(self.endpoint_timeout_secs)
    }

    pub fn dispatch_timeout(&self) -> Duration {
        Duration::from_secs(self.dispatch_timeout_secs)
    }
}

impl ServiceConfig {
    /// Load configuration from a TOML file. Missing tables and keys fall
    /// back to defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, HealthError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            HealthError::new(
                HealthErrorKind::Internal,
                format!("read config {}: {e}", path.display()),
            )
        })?;
        toml::from_str(&contents).map_err(|e| {
            HealthError::new(
                HealthErrorKind::Internal,
                format!("parse config {}: {e}", path.display()),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_missing_tables() {
        let config: ServiceConfig = toml::from_str("").unwrap();
        assert_eq!(config.store.data_dir, PathBuf::from("./data"));
        assert!(config.notify.urls.is_empty());
        assert_eq!(config.evaluator.trend_window, 5);
    }

    #[test]
    fn partial_config_parses() {
        let config: ServiceConfig = toml::from_str(
            r#"
            [store]
            data_dir = "/var/lib/drivewatch"

            [notify]
            urls = ["https://example.com/hook", "script:///usr/local/bin/alert"]
            endpoint_timeout_secs = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.store.data_dir, PathBuf::from("/var/lib/drivewatch"));
        assert_eq!(config.notify.urls.len(), 2);
        assert_eq!(config.notify.endpoint_timeout(), Duration::from_secs(3));
        assert_eq!(config.notify.dispatch_timeout(), Duration::from_secs(30));
    }
}
