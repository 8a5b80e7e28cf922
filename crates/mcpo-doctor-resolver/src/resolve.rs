//! Executable path resolution entry points.

use super::env::{EnvProvider, SystemEnv};
use super::fs::{FsProvider, SystemFs};
use super::search::ExecutableSearcher;
use super::types::{Attempt, AttemptOutcome, ResolveError, ResolveResult};
use std::path::Path;

/// Resolve a command to an absolute executable path.
///
/// A command with a directory component (`./bin/mcpo`, `/usr/bin/npx`) is
/// checked where it points. A bare name is looked up in each `PATH`
/// directory in order.
pub fn resolve_executable(command: &str) -> Result<ResolveResult, ResolveError> {
    resolve_executable_with_deps(command, &SystemEnv, &SystemFs)
}

/// Resolve with injected dependencies (for testing).
pub fn resolve_executable_with_deps(
    command: &str,
    env: &dyn EnvProvider,
    fs: &dyn FsProvider,
) -> Result<ResolveResult, ResolveError> {
    if command.is_empty() {
        return Err(ResolveError::EmptyCommand);
    }

    let command_path = Path::new(command);
    if has_directory_component(command_path) {
        let candidate =
            std::path::absolute(command_path).unwrap_or_else(|_| command_path.to_path_buf());
        let outcome = fs.check_executable(&candidate);
        let found = outcome == AttemptOutcome::Ok;
        let attempts = vec![Attempt {
            candidate: candidate.clone(),
            outcome,
        }];
        if found {
            return Ok(ResolveResult {
                resolved_path: candidate,
                attempts,
            });
        }
        return Err(ResolveError::not_resolved(command, &attempts));
    }

    let attempts = ExecutableSearcher::new(env, fs).search_in_path(command);
    match find_success(&attempts) {
        Some(success) => Ok(ResolveResult {
            resolved_path: success.candidate.clone(),
            attempts,
        }),
        None => Err(ResolveError::not_resolved(command, &attempts)),
    }
}

fn has_directory_component(path: &Path) -> bool {
    path.parent()
        .is_some_and(|parent| !parent.as_os_str().is_empty())
}

fn find_success(attempts: &[Attempt]) -> Option<&Attempt> {
    attempts.iter().find(|a| a.outcome == AttemptOutcome::Ok)
}
