use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use tracing::trace;

use crate::monitors::{Thresholds, cooldown::DEFAULT_COOLDOWN};
use crate::notifier::{DEFAULT_APP_NAME, DEFAULT_NOTIFICATION_TIMEOUT};
use crate::storage::DEFAULT_LOG_FILE;
use crate::util;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid configuration file provided: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Monitor configuration
///
/// Every field has a default, so an empty JSON object is a valid file.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seconds between two samples
    pub interval: u64,

    /// Minimum seconds between two notifications of the same kind
    pub cooldown: u64,

    pub thresholds: Thresholds,

    /// CSV file the samples are appended to
    pub log_file: PathBuf,

    /// Name alerts are grouped under
    pub app_name: String,

    /// Seconds a notification should stay visible
    pub notification_timeout: u64,

    /// Alert channel; alerts are only logged when unset
    pub alert: Option<Alert>,

    /// Log filter for the crate's own tracing output
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interval: 5,
            cooldown: DEFAULT_COOLDOWN.as_secs(),
            thresholds: Thresholds::default(),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            app_name: DEFAULT_APP_NAME.to_string(),
            notification_timeout: DEFAULT_NOTIFICATION_TIMEOUT.as_secs(),
            alert: None,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown)
    }

    pub fn notification_timeout(&self) -> Duration {
        Duration::from_secs(self.notification_timeout)
    }

    /// Override fields from `MONITOR_*` environment variables.
    pub fn apply_env(&mut self) {
        if let Some(interval) = util::get_interval() {
            self.interval = interval;
        }
        if let Some(cooldown) = util::get_cooldown() {
            self.cooldown = cooldown;
        }
        if let Some(log_file) = util::get_log_file() {
            self.log_file = log_file;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval == 0 {
            return Err(ConfigError::Invalid(
                "interval must be at least 1 second".to_string(),
            ));
        }

        let Thresholds { cpu, ram, disk } = self.thresholds;
        for (name, limit) in [("cpu", cpu), ("ram", ram), ("disk", disk)] {
            if !(0.0..=100.0).contains(&limit) {
                return Err(ConfigError::Invalid(format!(
                    "{name} threshold {limit} is not a percentage"
                )));
            }
        }

        if self.log_file.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("log_file must not be empty".to_string()));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alert {
    Discord(Discord),
    Webhook(Webhook),
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Webhook {
    pub url: String,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Discord {
    pub url: String,
    pub user_id: Option<String>,
}

pub fn read_config_file(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let file_content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: Config = serde_json::from_str(&file_content)?;
    trace!("loaded config: {config:?}");
    Ok(config)
}
