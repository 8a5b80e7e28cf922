//! What a lookup found, and how it is explained when it finds nothing.
//!
//! The attempt trail ends up in the doctor's FAIL lines and in the
//! `launcher_missing` result of a start, so an operator can see which PATH
//! entries were tried for a server command or for `mcpo` itself.

use std::fmt;
use std::path::PathBuf;

/// Successful lookup of a server command, interpreter or launcher.
#[derive(Debug, Clone)]
pub struct ResolveResult {
    pub resolved_path: PathBuf,
    /// Candidates checked before (and including) the hit.
    pub attempts: Vec<Attempt>,
}

/// One candidate path and the verdict on it.
#[derive(Debug, Clone)]
pub struct Attempt {
    pub candidate: PathBuf,
    pub outcome: AttemptOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// A regular file the gateway could execute.
    Ok,
    NotFound,
    /// Something other than a regular file, usually a directory on PATH.
    NotAFile,
    /// Installed without the execute bit, a common result of copying a venv.
    NotExecutable,
    PermissionDenied,
    IoError(String),
}

impl fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Ok => "OK",
            Self::NotFound => "not found",
            Self::NotAFile => "not a file",
            Self::NotExecutable => "not executable",
            Self::PermissionDenied => "permission denied",
            Self::IoError(msg) => return write!(f, "I/O error: {msg}"),
        };
        f.write_str(text)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("Command is empty")]
    EmptyCommand,

    /// `attempts` is pre-rendered, one indented line per candidate.
    #[error("Could not resolve '{command}' to an executable path. Tried:\n{attempts}")]
    NotResolved { command: String, attempts: String },
}

impl ResolveError {
    pub fn not_resolved(command: impl Into<String>, attempts: &[Attempt]) -> Self {
        let trail = if attempts.is_empty() {
            "  (no candidates checked)".to_string()
        } else {
            attempts
                .iter()
                .map(|a| format!("  ✗ {}: {}", a.candidate.display(), a.outcome))
                .collect::<Vec<_>>()
                .join("\n")
        };

        Self::NotResolved {
            command: command.into(),
            attempts: trail,
        }
    }
}
