//! Core of `mcpo-doctor`: domain types, ports and the staged diagnostic
//! pipeline for the MCPO plugin.
//!
//! This crate performs no process or network I/O itself. Adapters for the
//! ports live in `mcpo-doctor-resolver`, `mcpo-doctor-runtime` and
//! `mcpo-doctor-cli`.
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::{
    CheckOutcome, DEFAULT_MCPO_PORT, DEFAULT_STARTUP_TIMEOUT, MCP_SERVERS_FIELD, PluginConfig,
    SUCCESS_STATUS, ServerAction, ServerEntry, ServerManifest, Stage, StepResult, StepVerdict,
    Verdict,
};
pub use error::{CommandDiagnosis, DiagnosticError};
pub use ports::{
    DiagnosticReporter, ExecutableProbe, ManagedServer, RecordingReporter, ReportEvent,
};
pub use services::{
    ConfigValidator, DEFAULT_SETTLE_DELAY, DependencyGate, DiagnosticOptions, DiagnosticService,
    EXIT_FAILURE, EXIT_SUCCESS, GateState, OutcomeTally, PrimaryCommand, RunReport, RunStatus,
};
