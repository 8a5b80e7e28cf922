//! Filesystem provider trait for testable path resolution.

use super::types::AttemptOutcome;
use std::path::Path;

/// Filesystem checks used by the resolver (injectable for testing).
pub trait FsProvider: Send + Sync {
    /// Classify `path` as a runnable executable or explain why it is not.
    fn check_executable(&self, path: &Path) -> AttemptOutcome;

    /// Whether anything exists at `path`, executable or not.
    fn exists(&self, path: &Path) -> bool;
}

/// Real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemFs;

impl FsProvider for SystemFs {
    fn check_executable(&self, path: &Path) -> AttemptOutcome {
        if !path.exists() {
            return AttemptOutcome::NotFound;
        }

        if !path.is_file() {
            return AttemptOutcome::NotAFile;
        }

        // Windows treats PATHEXT matches as executable
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            match std::fs::metadata(path) {
                Ok(metadata) => {
                    if metadata.permissions().mode() & 0o111 == 0 {
                        return AttemptOutcome::NotExecutable;
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                    return AttemptOutcome::PermissionDenied;
                }
                Err(e) => {
                    return AttemptOutcome::IoError(e.to_string());
                }
            }
        }

        AttemptOutcome::Ok
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// Filesystem with predefined responses.
#[cfg(test)]
#[derive(Default)]
pub struct MockFs {
    executables: std::collections::HashSet<std::path::PathBuf>,
    non_executables: std::collections::HashSet<std::path::PathBuf>,
}

#[cfg(test)]
impl MockFs {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_executable(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.executables.insert(path.into());
        self
    }

    #[must_use]
    pub fn with_non_executable(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.non_executables.insert(path.into());
        self
    }
}

#[cfg(test)]
impl FsProvider for MockFs {
    fn check_executable(&self, path: &Path) -> AttemptOutcome {
        if self.executables.contains(path) {
            AttemptOutcome::Ok
        } else if self.non_executables.contains(path) {
            AttemptOutcome::NotExecutable
        } else {
            AttemptOutcome::NotFound
        }
    }

    fn exists(&self, path: &Path) -> bool {
        self.executables.contains(path) || self.non_executables.contains(path)
    }
}
