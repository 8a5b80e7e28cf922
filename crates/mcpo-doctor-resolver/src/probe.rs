//! [`ExecutableProbe`] adapter backed by the search-path resolver.

use std::path::{Path, PathBuf};

use mcpo_doctor_core::ExecutableProbe;
use tracing::debug;

use super::env::{EnvProvider, SystemEnv};
use super::fs::{FsProvider, SystemFs};
use super::resolve::resolve_executable_with_deps;

/// Looks commands up the way a shell would, through `PATH`.
#[derive(Debug, Clone, Default)]
pub struct PathProbe<E = SystemEnv, F = SystemFs> {
    env: E,
    fs: F,
}

impl PathProbe {
    /// Probe the live process environment and filesystem.
    pub const fn system() -> Self {
        Self {
            env: SystemEnv,
            fs: SystemFs,
        }
    }
}

impl<E: EnvProvider, F: FsProvider> PathProbe<E, F> {
    pub const fn with_providers(env: E, fs: F) -> Self {
        Self { env, fs }
    }
}

impl<E: EnvProvider, F: FsProvider> ExecutableProbe for PathProbe<E, F> {
    fn which(&self, command: &str) -> Option<PathBuf> {
        match resolve_executable_with_deps(command, &self.env, &self.fs) {
            Ok(result) => {
                debug!(
                    command,
                    path = %result.resolved_path.display(),
                    attempts = result.attempts.len(),
                    "Resolved executable"
                );
                Some(result.resolved_path)
            }
            Err(err) => {
                debug!(command, error = %err, "Executable not resolved");
                None
            }
        }
    }

    fn file_exists(&self, path: &Path) -> bool {
        self.fs.exists(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MockEnv;
    use crate::fs::MockFs;

    #[test]
    fn test_which_resolves_through_path() {
        let probe = PathProbe::with_providers(
            MockEnv::new().with_var("PATH", "/usr/bin:/usr/local/bin"),
            MockFs::new().with_executable("/usr/local/bin/mcpo"),
        );

        assert_eq!(
            probe.which("mcpo"),
            Some(PathBuf::from("/usr/local/bin/mcpo"))
        );
        assert_eq!(probe.which("uvx"), None);
        assert_eq!(probe.which(""), None);
    }

    #[test]
    fn test_file_exists_ignores_path() {
        let probe = PathProbe::with_providers(
            MockEnv::new().with_var("PATH", "/usr/bin"),
            MockFs::new().with_non_executable("/usr/src/app/pydeps/bin/mcpo"),
        );

        assert_eq!(probe.which("mcpo"), None);
        assert!(probe.file_exists(Path::new("/usr/src/app/pydeps/bin/mcpo")));
        assert!(!probe.file_exists(Path::new("/usr/bin/mcpo")));
    }

    #[test]
    fn test_system_probe_checks_real_filesystem() {
        let dir = tempfile::tempdir().unwrap();
        let probe = PathProbe::system();

        assert!(probe.file_exists(dir.path()));
        assert!(!probe.file_exists(&dir.path().join("missing")));
    }
}
