//! Port definitions (trait abstractions) for external collaborators.
//!
//! Core owns the traits; adapters live in other crates:
//! - `mcpo-doctor-resolver` implements [`ExecutableProbe`]
//! - `mcpo-doctor-runtime` implements [`ManagedServer`]
//! - `mcpo-doctor-cli` implements [`DiagnosticReporter`]

mod executable_probe;
mod managed_server;
mod reporter;

pub use executable_probe::ExecutableProbe;
pub use managed_server::ManagedServer;
pub use reporter::{DiagnosticReporter, RecordingReporter, ReportEvent};
