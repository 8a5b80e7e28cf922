//! Executable resolution for `mcpo-doctor`.
//!
//! Resolves command names (like `npx` or `mcpo`) to absolute executable
//! paths by walking the search path, and adapts that search to the core
//! [`ExecutableProbe`](mcpo_doctor_core::ExecutableProbe) port.
//!
//! ## Architecture
//!
//! - `types`: resolution result, attempts and errors
//! - `env`: environment variable access (injectable for testing)
//! - `fs`: filesystem checks (injectable for testing)
//! - `search`: search-path walking
//! - `resolve`: resolution entry points
//! - `probe`: the [`PathProbe`] port adapter
//!
//! ## Usage
//!
//! ```rust,no_run
//! use mcpo_doctor_resolver::resolve_executable;
//!
//! let result = resolve_executable("npx").unwrap();
//! println!("Resolved to: {}", result.resolved_path.display());
//!
//! for attempt in &result.attempts {
//!     println!("  {} - {}", attempt.candidate.display(), attempt.outcome);
//! }
//! ```
#![deny(unused_crate_dependencies)]

mod env;
mod fs;
mod probe;
mod resolve;
mod search;
mod types;

pub use env::{EnvProvider, SystemEnv};
pub use fs::{FsProvider, SystemFs};
pub use probe::PathProbe;
pub use resolve::{resolve_executable, resolve_executable_with_deps};
pub use types::{Attempt, AttemptOutcome, ResolveError, ResolveResult};

#[cfg(test)]
pub use env::MockEnv;
#[cfg(test)]
pub use fs::MockFs;
