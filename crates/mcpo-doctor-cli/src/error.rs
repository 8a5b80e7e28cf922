//! CLI error types and exit code mapping.

use mcpo_doctor_core::EXIT_FAILURE;
use mcpo_doctor_runtime::ConfigLoadError;
use thiserror::Error;

/// Failures before the first diagnostic stage runs.
#[derive(Debug, Error)]
pub enum CliError {
    /// The plugin configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigLoadError),

    /// The plugin adapter could not be constructed.
    #[error("Failed to initialise the MCPO plugin: {0}")]
    Runtime(String),
}

impl CliError {
    /// Process exit code; every failure before the stages is a diagnostic failure.
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) | Self::Runtime(_) => EXIT_FAILURE,
        }
    }
}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        Self::Runtime(format!("{err:#}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_exit_one() {
        let err = CliError::from(ConfigLoadError::InvalidPort {
            value: "abc".to_string(),
        });
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("MCPO_PORT"));
    }

    #[test]
    fn test_runtime_error_keeps_cause_chain() {
        let err = CliError::from(
            anyhow::anyhow!("no home directory").context("Cannot locate PID directory"),
        );
        assert_eq!(err.exit_code(), 1);
        assert_eq!(
            err.to_string(),
            "Failed to initialise the MCPO plugin: Cannot locate PID directory: no home directory"
        );
    }
}
