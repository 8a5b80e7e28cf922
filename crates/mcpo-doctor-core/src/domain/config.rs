//! Plugin configuration snapshot.
//!
//! The snapshot is produced once by the plugin configuration loader and is
//! read-only afterwards. Every stage receives it by reference.

use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

/// Default port the MCPO gateway listens on.
pub const DEFAULT_MCPO_PORT: u16 = 9000;

/// Default time allowed for a freshly spawned gateway to answer HTTP.
pub const DEFAULT_STARTUP_TIMEOUT: Duration = Duration::from_secs(30);

/// Immutable configuration reported by the MCPO plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginConfig {
    /// Port the gateway binds to (`MCPO_PORT`). Informational for the checks.
    pub port: u16,
    /// Path to the MCP server manifest (`MCP_CONFIG_PATH`).
    pub config_path: PathBuf,
    /// Interpreter used by the plugin (`PYTHON_EXECUTABLE`).
    pub python_executable: String,
    /// Optional API key the gateway is protected with (`MCPO_API_KEY`).
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// How long `start` waits for the gateway to answer (`MCPO_STARTUP_TIMEOUT_SECS`).
    pub startup_timeout: Duration,
}

impl PluginConfig {
    /// Create a snapshot with the three required values and default extras.
    pub fn new(
        port: u16,
        config_path: impl Into<PathBuf>,
        python_executable: impl Into<String>,
    ) -> Self {
        Self {
            port,
            config_path: config_path.into(),
            python_executable: python_executable.into(),
            api_key: None,
            startup_timeout: DEFAULT_STARTUP_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    #[must_use]
    pub const fn with_startup_timeout(mut self, timeout: Duration) -> Self {
        self.startup_timeout = timeout;
        self
    }

    /// Base URL of the gateway's HTTP interface.
    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }
}
