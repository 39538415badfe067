//! Configuration for the notification client
//!
//! # Settings Sources Priority
//!
//! 1. Command-line arguments
//! 2. TOML file (`--config`, then `PROPDESK_NOTIFY_CONFIG`, then
//!    `<user config dir>/propdesk/notify.toml`)
//! 3. Built-in defaults

use crate::center::CenterSettings;
use crate::error::{Error, Result};
use crate::model::UserRole;
use propdesk_common::config::{load_toml_or_default, resolve_config_path};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "PROPDESK_NOTIFY_CONFIG";

/// Config file name under the user config directory
pub const CONFIG_FILE_NAME: &str = "notify.toml";

/// Client configuration loaded from TOML
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct NotifyConfig {
    /// Backend base URL, e.g. `http://localhost:5000/api`
    pub api_base_url: String,

    /// Bearer token sent with every request (optional)
    pub auth_token: Option<String>,

    /// Role of the signed-in user; decides meeting navigation
    pub role: UserRole,

    pub poll_interval_secs: u64,

    /// Maximum notifications requested per poll
    pub fetch_limit: usize,

    /// Delay between successive announcements in one cycle
    pub stagger_ms: u64,

    pub toast_duration_ms: u64,

    pub request_timeout_secs: u64,

    pub sound_enabled: bool,

    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000/api".to_string(),
            auth_token: None,
            role: UserRole::default(),
            poll_interval_secs: 30,
            fetch_limit: 50,
            stagger_ms: 500,
            toast_duration_ms: 5000,
            request_timeout_secs: 15,
            sound_enabled: true,
            logging: LoggingConfig::default(),
        }
    }
}

impl NotifyConfig {
    /// Resolve and load the config file, then validate it.
    pub fn load(cli_path: Option<&Path>) -> Result<Self> {
        let path = resolve_config_path(cli_path, CONFIG_ENV_VAR, CONFIG_FILE_NAME);
        let config: Self = load_toml_or_default(path.as_deref())?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the runtime cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.trim().is_empty() {
            return Err(invalid("api_base_url must not be empty"));
        }
        if self.poll_interval_secs == 0 {
            return Err(invalid("poll_interval_secs must be at least 1"));
        }
        if self.fetch_limit == 0 {
            return Err(invalid("fetch_limit must be at least 1"));
        }
        if self.request_timeout_secs == 0 {
            return Err(invalid("request_timeout_secs must be at least 1"));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Timing knobs for the notification center
    pub fn center_settings(&self) -> CenterSettings {
        CenterSettings {
            poll_interval: Duration::from_secs(self.poll_interval_secs),
            fetch_limit: self.fetch_limit,
            stagger: Duration::from_millis(self.stagger_ms),
            toast_duration: Duration::from_millis(self.toast_duration_ms),
        }
    }
}

fn invalid(message: &str) -> Error {
    Error::Config(propdesk_common::Error::Config(message.to_string()))
}
