//! Plugin configuration loader.
//!
//! The MCPO plugin reads its settings from a dotenv-style `config.env` next
//! to the plugin, and the process environment overrides individual keys.
//! Loading happens once; the resulting [`PluginConfig`] is read-only.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use mcpo_doctor_core::{DEFAULT_MCPO_PORT, DEFAULT_STARTUP_TIMEOUT, PluginConfig};
use thiserror::Error;
use tracing::debug;

/// Plugin env file looked up in the working directory by default.
pub const PLUGIN_ENV_FILE: &str = "config.env";

pub const MCPO_PORT: &str = "MCPO_PORT";
pub const MCP_CONFIG_PATH: &str = "MCP_CONFIG_PATH";
pub const PYTHON_EXECUTABLE: &str = "PYTHON_EXECUTABLE";
pub const MCPO_API_KEY: &str = "MCPO_API_KEY";
pub const MCPO_STARTUP_TIMEOUT_SECS: &str = "MCPO_STARTUP_TIMEOUT_SECS";

/// Every key the loader understands.
pub const PLUGIN_ENV_KEYS: [&str; 5] = [
    MCPO_PORT,
    MCP_CONFIG_PATH,
    PYTHON_EXECUTABLE,
    MCPO_API_KEY,
    MCPO_STARTUP_TIMEOUT_SECS,
];

pub const DEFAULT_MCP_CONFIG_PATH: &str = "./mcp-config.json";
pub const DEFAULT_PYTHON_EXECUTABLE: &str = "python3";

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("Plugin env file not found: {}", path.display())]
    EnvFileMissing { path: PathBuf },

    #[error("Failed to read plugin env file {}: {source}", path.display())]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    #[error("{MCPO_PORT} must be a port number (0-65535), got '{value}'")]
    InvalidPort { value: String },

    #[error("{MCPO_STARTUP_TIMEOUT_SECS} must be a whole number of seconds, got '{value}'")]
    InvalidTimeout { value: String },
}

/// Load the plugin configuration.
///
/// With `env_file` set, that file must exist. Without it, `config.env` in
/// the working directory is used when present.
pub fn load_plugin_config(env_file: Option<&Path>) -> Result<PluginConfig, ConfigLoadError> {
    let mut vars = match env_file {
        Some(path) if !path.exists() => {
            return Err(ConfigLoadError::EnvFileMissing {
                path: path.to_path_buf(),
            });
        }
        Some(path) => read_env_file(path)?,
        None => {
            let default = Path::new(PLUGIN_ENV_FILE);
            if default.exists() {
                read_env_file(default)?
            } else {
                debug!(file = PLUGIN_ENV_FILE, "No plugin env file, using defaults");
                HashMap::new()
            }
        }
    };

    overlay_process_env(&mut vars);
    build_plugin_config(&vars)
}

/// Parse a dotenv file into key/value pairs without touching the process
/// environment.
pub fn read_env_file(path: &Path) -> Result<HashMap<String, String>, ConfigLoadError> {
    let env_file_error = |source| ConfigLoadError::EnvFile {
        path: path.to_path_buf(),
        source,
    };

    let mut vars = HashMap::new();
    for item in dotenvy::from_path_iter(path).map_err(env_file_error)? {
        let (key, value) = item.map_err(env_file_error)?;
        vars.insert(key, value);
    }

    debug!(path = %path.display(), keys = vars.len(), "Loaded plugin env file");
    Ok(vars)
}

fn overlay_process_env(vars: &mut HashMap<String, String>) {
    for key in PLUGIN_ENV_KEYS {
        if let Ok(value) = std::env::var(key) {
            debug!(key, "Process environment overrides plugin env file");
            vars.insert(key.to_string(), value);
        }
    }
}

/// Build the snapshot from resolved key/value pairs, applying defaults.
///
/// Blank values count as unset.
pub fn build_plugin_config(
    vars: &HashMap<String, String>,
) -> Result<PluginConfig, ConfigLoadError> {
    let port = match lookup(vars, MCPO_PORT) {
        Some(raw) => raw.parse::<u16>().map_err(|_| ConfigLoadError::InvalidPort {
            value: raw.to_string(),
        })?,
        None => DEFAULT_MCPO_PORT,
    };

    let startup_timeout = match lookup(vars, MCPO_STARTUP_TIMEOUT_SECS) {
        Some(raw) => raw
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| ConfigLoadError::InvalidTimeout {
                value: raw.to_string(),
            })?,
        None => DEFAULT_STARTUP_TIMEOUT,
    };

    let config = PluginConfig::new(
        port,
        lookup(vars, MCP_CONFIG_PATH).unwrap_or(DEFAULT_MCP_CONFIG_PATH),
        lookup(vars, PYTHON_EXECUTABLE).unwrap_or(DEFAULT_PYTHON_EXECUTABLE),
    )
    .with_startup_timeout(startup_timeout);

    Ok(match lookup(vars, MCPO_API_KEY) {
        Some(key) => config.with_api_key(key),
        None => config,
    })
}

fn lookup<'a>(vars: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    vars.get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}
