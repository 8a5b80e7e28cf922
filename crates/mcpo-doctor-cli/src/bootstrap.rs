//! CLI bootstrap - the composition root.
//!
//! The only place where the concrete adapters are wired together: the
//! search-path probe (mcpo-doctor-resolver), the MCPO plugin
//! (mcpo-doctor-runtime) and the diagnostic service (mcpo-doctor-core).

use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;

use mcpo_doctor_core::{DiagnosticOptions, DiagnosticService, PluginConfig};
use mcpo_doctor_resolver::PathProbe;
use mcpo_doctor_runtime::{McpoPlugin, load_plugin_config};
use tracing::debug;

use crate::error::CliError;
use crate::parser::Cli;

/// Bootstrap configuration derived from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Plugin env file; `None` means `./config.env` if present.
    pub plugin_env: Option<PathBuf>,
    pub verbose: bool,
    /// Colored console output.
    pub color: bool,
}

impl CliConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            plugin_env: cli.plugin_env.clone(),
            verbose: cli.verbose,
            color: !cli.no_color
                && std::env::var_os("NO_COLOR").is_none()
                && std::io::stdout().is_terminal(),
        }
    }
}

/// Fully composed diagnostic.
pub struct CliContext {
    /// The loaded configuration snapshot.
    pub config: PluginConfig,
    pub service: DiagnosticService,
}

/// Load the plugin configuration and compose the diagnostic.
pub fn bootstrap(config: &CliConfig) -> Result<CliContext, CliError> {
    let plugin_config = load_plugin_config(config.plugin_env.as_deref())?;
    debug!(
        port = plugin_config.port,
        config_path = %plugin_config.config_path.display(),
        "Loaded plugin configuration"
    );

    let plugin = McpoPlugin::new(plugin_config.clone())?;
    let service = DiagnosticService::new(
        Arc::new(PathProbe::system()),
        Arc::new(plugin),
        DiagnosticOptions::default(),
    );

    Ok(CliContext {
        config: plugin_config,
        service,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcpo_doctor_runtime::ConfigLoadError;

    #[test]
    fn test_missing_plugin_env_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = CliConfig {
            plugin_env: Some(dir.path().join("config.env")),
            verbose: false,
            color: false,
        };

        let Err(err) = bootstrap(&config) else {
            panic!("bootstrap must fail without a plugin env file");
        };
        assert!(matches!(
            err,
            CliError::Config(ConfigLoadError::EnvFileMissing { .. })
        ));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_no_color_flag_wins() {
        let cli = Cli {
            plugin_env: None,
            verbose: true,
            no_color: true,
        };
        let config = CliConfig::from_cli(&cli);
        assert!(!config.color);
        assert!(config.verbose);
    }
}
