//! Configuration file resolution and loading
//!
//! Config file location priority:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. `<user config dir>/propdesk/<file_name>`
//! 4. None: built-in defaults are used
//!
//! A missing file is not an error. Clients must start with defaults and a
//! warning rather than refuse to run; only a file that exists but cannot be
//! read or parsed is reported.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Application directory name under the platform config directory
pub const APP_DIR: &str = "propdesk";

/// Resolve which config file to read.
///
/// Returns `None` when no candidate exists. An explicit CLI path or env var
/// is returned even if the file is missing, so that [`load_toml_or_default`]
/// can warn about it.
pub fn resolve_config_path(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    file_name: &str,
) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: user config directory
    let user_config = default_config_path(file_name)?;
    if user_config.exists() {
        Some(user_config)
    } else {
        debug!("No config file at {}", user_config.display());
        None
    }
}

/// Platform default location, e.g. `~/.config/propdesk/notify.toml` on Linux
pub fn default_config_path(file_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join(file_name))
}

/// Parse a TOML config document.
pub fn parse_toml<T: DeserializeOwned>(content: &str) -> Result<T> {
    Ok(toml::from_str(content)?)
}

/// Load a TOML config file, falling back to `T::default()` if it is absent.
///
/// - `None` path: defaults
/// - path that does not exist: warning + defaults
/// - unreadable or malformed file: error
pub fn load_toml_or_default<T>(path: Option<&Path>) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let Some(path) = path else {
        info!("No config file found, using built-in defaults");
        return Ok(T::default());
    };

    if !path.exists() {
        warn!(
            "Config file {} not found, using built-in defaults",
            path.display()
        );
        return Ok(T::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config = parse_toml(&content).map_err(|e| match e {
        Error::ConfigParse(inner) => {
            Error::Config(format!("{}: {}", path.display(), inner))
        }
        other => other,
    })?;

    info!("Loaded config from {}", path.display());
    Ok(config)
}
