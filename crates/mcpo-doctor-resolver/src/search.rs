//! Search-path walking.

use super::env::EnvProvider;
use super::fs::FsProvider;
use super::types::{Attempt, AttemptOutcome};
use std::path::PathBuf;

/// Walks the directories of `PATH` looking for an executable.
pub struct ExecutableSearcher<'a> {
    env: &'a dyn EnvProvider,
    fs: &'a dyn FsProvider,
}

impl<'a> ExecutableSearcher<'a> {
    pub fn new(env: &'a dyn EnvProvider, fs: &'a dyn FsProvider) -> Self {
        Self { env, fs }
    }

    /// Check `command` in every `PATH` directory, stopping at the first hit.
    ///
    /// The returned attempts end with the successful one, if any.
    pub fn search_in_path(&self, command: &str) -> Vec<Attempt> {
        let mut attempts = Vec::new();

        let Some(path_var) = self.env.get("PATH") else {
            return attempts;
        };
        let Some(path_str) = path_var.to_str() else {
            return attempts;
        };

        for dir in path_str.split(Self::path_separator()) {
            if dir.is_empty() {
                continue;
            }

            for name in self.candidate_names(command) {
                let candidate = PathBuf::from(dir).join(&name);
                let outcome = self.fs.check_executable(&candidate);
                let found = outcome == AttemptOutcome::Ok;
                attempts.push(Attempt { candidate, outcome });
                if found {
                    return attempts;
                }
            }
        }

        attempts
    }

    /// File names to try for `command` in one directory.
    #[cfg(not(windows))]
    #[allow(clippy::unused_self)]
    fn candidate_names(&self, command: &str) -> Vec<String> {
        vec![command.to_string()]
    }

    /// PATHEXT variants (e.g., npx -> [npx, npx.cmd, npx.exe, npx.bat]).
    #[cfg(windows)]
    fn candidate_names(&self, command: &str) -> Vec<String> {
        let mut variants = vec![command.to_string()];

        if let Some(pathext) = self.env.get("PATHEXT")
            && let Some(pathext_str) = pathext.to_str()
        {
            for ext in pathext_str.split(';') {
                if !ext.is_empty() {
                    variants.push(format!("{command}{ext}"));
                }
            }
        } else {
            for ext in [".cmd", ".exe", ".bat", ".com"] {
                variants.push(format!("{command}{ext}"));
            }
        }

        variants
    }

    #[cfg(unix)]
    const fn path_separator() -> char {
        ':'
    }

    #[cfg(windows)]
    const fn path_separator() -> char {
        ';'
    }
}
