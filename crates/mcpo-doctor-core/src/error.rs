//! Diagnostic error taxonomy.
//!
//! Hard-gate errors halt the run and carry the context an operator needs to
//! fix the problem: the offending path, the command name or the parser's
//! position.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::domain::Stage;

/// Why the primary launcher could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandDiagnosis {
    /// The executable exists at the well-known install location, but that
    /// directory is not on the search path.
    PathMisconfigured { found_at: PathBuf },
    /// The executable exists neither on the search path nor at the
    /// well-known install location.
    NotInstalled { checked: PathBuf },
}

impl fmt::Display for CommandDiagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PathMisconfigured { found_at } => write!(
                f,
                "PATH misconfigured: installed at {} but that directory is not on PATH",
                found_at.display()
            ),
            Self::NotInstalled { checked } => {
                write!(f, "not installed: also missing at {}", checked.display())
            }
        }
    }
}

/// Errors raised by diagnostic stages.
#[derive(Debug, Error)]
pub enum DiagnosticError {
    #[error("Config file does not exist: {}", path.display())]
    ConfigMissing { path: PathBuf },

    #[error(
        "Config file {} has a syntax error at line {line}, column {column}: {message}",
        path.display()
    )]
    ConfigMalformed {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Failed to read config file {}: {source}", path.display())]
    ConfigUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Configured PYTHON_EXECUTABLE '{executable}' was not found on PATH")]
    InterpreterNotFound { executable: String },

    #[error("'{command}' was not found on PATH ({diagnosis})")]
    CommandNotFound {
        command: String,
        diagnosis: CommandDiagnosis,
    },

    #[error("Dependency '{command}' (used by {server}) was not found on PATH")]
    DependencyUnresolved { server: String, command: String },

    #[error("{step} failed: {reason}")]
    LifecycleStepFailed { step: Stage, reason: String },
}

impl DiagnosticError {
    /// Stage that produced the error.
    pub const fn stage(&self) -> Stage {
        match self {
            Self::ConfigMissing { .. } => Stage::LocateConfig,
            Self::ConfigMalformed { .. } | Self::ConfigUnreadable { .. } => Stage::ParseConfig,
            Self::InterpreterNotFound { .. } => Stage::CheckInterpreter,
            Self::CommandNotFound { .. } => Stage::CheckPrimaryCommand,
            Self::DependencyUnresolved { .. } => Stage::CheckDependencies,
            Self::LifecycleStepFailed { step, .. } => *step,
        }
    }

    /// Whether the error halts the run.
    pub const fn is_fatal(&self) -> bool {
        self.stage().is_hard_gate()
    }

    /// Build a `ConfigMalformed` error from a JSON parser error.
    pub fn malformed(path: impl Into<PathBuf>, err: &serde_json::Error) -> Self {
        Self::ConfigMalformed {
            path: path.into(),
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_carries_position() {
        let err = serde_json::from_str::<serde_json::Value>("{\n  \"a\": ,\n}").unwrap_err();
        let diag = DiagnosticError::malformed("/etc/mcp.json", &err);
        match &diag {
            DiagnosticError::ConfigMalformed { line, column, .. } => {
                assert_eq!(*line, 2);
                assert!(*column > 0);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(diag.to_string().contains("line 2"));
        assert_eq!(diag.stage(), Stage::ParseConfig);
    }

    #[test]
    fn test_dependency_errors_are_not_fatal() {
        let err = DiagnosticError::DependencyUnresolved {
            server: "fs".to_string(),
            command: "npx".to_string(),
        };
        assert!(!err.is_fatal());
        assert!(err.to_string().contains("npx"));
    }

    #[test]
    fn test_command_not_found_message_names_diagnosis() {
        let err = DiagnosticError::CommandNotFound {
            command: "mcpo".to_string(),
            diagnosis: CommandDiagnosis::PathMisconfigured {
                found_at: PathBuf::from("/opt/bin/mcpo"),
            },
        };
        assert!(err.is_fatal());
        assert!(err.to_string().contains("PATH misconfigured"));
    }

    #[test]
    fn test_lifecycle_error_reports_its_step() {
        let err = DiagnosticError::LifecycleStepFailed {
            step: Stage::HealthCheck,
            reason: "timeout".to_string(),
        };
        assert_eq!(err.stage(), Stage::HealthCheck);
        assert_eq!(err.to_string(), "health_check failed: timeout");
    }
}
