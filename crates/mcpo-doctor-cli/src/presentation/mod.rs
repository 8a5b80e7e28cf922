//! Console presentation of diagnostic runs.
//!
//! Keep this module format-only: verdicts are decided in core services.

pub mod console;

pub use console::{ConsoleReporter, format_info, format_outcome, format_stage_header};
