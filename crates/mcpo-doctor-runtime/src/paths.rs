//! Runtime state locations.

use std::path::PathBuf;

use thiserror::Error;

/// Overrides the state directory (PID files live below it).
pub const STATE_DIR_ENV: &str = "MCPO_DOCTOR_STATE_DIR";

#[derive(Debug, Error)]
pub enum PathError {
    #[error("Cannot determine a state or data directory for PID files")]
    NoStateDir,
}

/// Root directory for runtime state.
///
/// Resolution order:
/// 1. `MCPO_DOCTOR_STATE_DIR`
/// 2. The platform state directory (e.g., `~/.local/state/mcpo-doctor`)
/// 3. The platform local data directory
pub fn state_root() -> Result<PathBuf, PathError> {
    if let Some(dir) = std::env::var_os(STATE_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }

    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .map(|dir| dir.join("mcpo-doctor"))
        .ok_or(PathError::NoStateDir)
}

/// Directory holding the gateway PID files.
pub fn pids_dir() -> Result<PathBuf, PathError> {
    Ok(state_root()?.join("pids"))
}
