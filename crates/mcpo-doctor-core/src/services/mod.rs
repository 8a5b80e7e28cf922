//! Diagnostic pipeline services.
//!
//! Data flows strictly downward: the config validator feeds the gate
//! sequencer, whose result gates the lifecycle exerciser, whose outcomes are
//! folded into a [`RunReport`].

mod config_validator;
mod diagnostic;
mod gate;
mod lifecycle;
mod report;

pub use config_validator::{
    ConfigValidator, DependencyCheck, DependencyReport, DependencyStatus, PRIMARY_COMMAND,
    PRIMARY_COMMAND_FALLBACK, PrimaryCommand,
};
pub use diagnostic::{DiagnosticOptions, DiagnosticService};
pub use gate::{DependencyGate, GateState, GateSummary};
pub use lifecycle::{DEFAULT_SETTLE_DELAY, LifecycleExerciser, StepRun};
pub use report::{
    EXIT_FAILURE, EXIT_SUCCESS, OutcomeTally, RunReport, RunStatus, TallyingReporter,
    failure_hint,
};
