//! Executable lookup port.

use std::path::{Path, PathBuf};

/// Port for locating executables.
///
/// Lookups never fail: an executable that cannot be found is a normal
/// `None` result.
pub trait ExecutableProbe: Send + Sync {
    /// Resolve `command` the way a shell would, returning the absolute path.
    fn which(&self, command: &str) -> Option<PathBuf>;

    /// Whether a file exists at `path`, on the search path or not.
    fn file_exists(&self, path: &Path) -> bool;
}
