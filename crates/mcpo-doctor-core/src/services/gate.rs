//! Dependency gate sequencer.
//!
//! Runs the configuration stages in a fixed order. A hard-gate failure moves
//! the sequencer to [`GateState::Aborted`] and nothing after it runs.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::domain::{CheckOutcome, ServerManifest, Stage};
use crate::error::{CommandDiagnosis, DiagnosticError};
use crate::ports::DiagnosticReporter;

use super::config_validator::{ConfigValidator, PrimaryCommand};

/// Progress of the gate sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    NotStarted,
    ConfigOk,
    DepsChecked,
    InterpreterOk,
    CommandOk,
    ReadyForLifecycle,
    Aborted,
}

impl GateState {
    /// The state a successful next stage leads to. Terminal states have none.
    pub const fn successor(self) -> Option<Self> {
        match self {
            Self::NotStarted => Some(Self::ConfigOk),
            Self::ConfigOk => Some(Self::DepsChecked),
            Self::DepsChecked => Some(Self::InterpreterOk),
            Self::InterpreterOk => Some(Self::CommandOk),
            Self::CommandOk => Some(Self::ReadyForLifecycle),
            Self::ReadyForLifecycle | Self::Aborted => None,
        }
    }

    pub const fn is_terminal(self) -> bool {
        self.successor().is_none()
    }
}

/// What the gate learned on the way to `ReadyForLifecycle`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateSummary {
    pub manifest: ServerManifest,
    pub interpreter: PathBuf,
    pub primary_command: PathBuf,
    /// Informational only; unresolved server commands never gate the run.
    pub unresolved_dependencies: usize,
}

/// Sequencer for the configuration and dependency stages.
pub struct DependencyGate<'a> {
    validator: ConfigValidator<'a>,
    primary: &'a PrimaryCommand,
    state: GateState,
}

impl<'a> DependencyGate<'a> {
    pub const fn new(validator: ConfigValidator<'a>, primary: &'a PrimaryCommand) -> Self {
        Self {
            validator,
            primary,
            state: GateState::NotStarted,
        }
    }

    pub const fn state(&self) -> GateState {
        self.state
    }

    /// Run every stage in order, reporting each verdict as it completes.
    pub fn run(
        &mut self,
        reporter: &mut dyn DiagnosticReporter,
    ) -> Result<GateSummary, DiagnosticError> {
        let result = self.run_stages(reporter);
        if result.is_err() {
            self.state = GateState::Aborted;
        }
        result
    }

    fn run_stages(
        &mut self,
        reporter: &mut dyn DiagnosticReporter,
    ) -> Result<GateSummary, DiagnosticError> {
        reporter.stage_started(Stage::LocateConfig);
        let path = self.validator.locate_config().inspect_err(|err| fail(reporter, err))?;
        reporter.outcome(&CheckOutcome::pass(
            Stage::LocateConfig,
            format!("Config file exists at {}", path.display()),
        ));

        reporter.stage_started(Stage::ParseConfig);
        let manifest = self.validator.parse_config().inspect_err(|err| fail(reporter, err))?;
        reporter.outcome(&CheckOutcome::pass(
            Stage::ParseConfig,
            format!("{} is valid JSON", display_name(path)),
        ));
        self.advance();

        reporter.stage_started(Stage::CheckDependencies);
        let dependencies = self.validator.check_dependencies(&manifest);
        for outcome in dependencies.outcomes() {
            reporter.outcome(&outcome);
        }
        let unresolved_dependencies = dependencies.unresolved();
        if unresolved_dependencies > 0 {
            info!(
                unresolved = unresolved_dependencies,
                "Continuing with unresolved server commands"
            );
        }
        self.advance();

        reporter.stage_started(Stage::CheckInterpreter);
        let interpreter = self
            .validator
            .check_interpreter()
            .inspect_err(|err| fail(reporter, err))?;
        reporter.outcome(&CheckOutcome::pass(
            Stage::CheckInterpreter,
            format!(
                "Interpreter found on PATH: {}",
                interpreter.display()
            ),
        ));
        self.advance();

        reporter.stage_started(Stage::CheckPrimaryCommand);
        let primary_command = self
            .validator
            .check_primary_command(self.primary)
            .inspect_err(|err| report_missing_command(reporter, self.primary, err))?;
        reporter.outcome(&CheckOutcome::pass(
            Stage::CheckPrimaryCommand,
            format!(
                "'{}' found on PATH: {}",
                self.primary.name,
                primary_command.display()
            ),
        ));
        self.advance();

        self.advance();
        Ok(GateSummary {
            manifest,
            interpreter,
            primary_command,
            unresolved_dependencies,
        })
    }

    fn advance(&mut self) {
        if let Some(next) = self.state.successor() {
            debug!(from = ?self.state, to = ?next, "Gate transition");
            self.state = next;
        }
    }
}

fn fail(reporter: &mut dyn DiagnosticReporter, err: &DiagnosticError) {
    reporter.outcome(&CheckOutcome::fail(err.stage(), err.to_string()));
}

/// Report a missing launcher: the diagnosis as a warning, then the failure.
fn report_missing_command(
    reporter: &mut dyn DiagnosticReporter,
    primary: &PrimaryCommand,
    err: &DiagnosticError,
) {
    let stage = Stage::CheckPrimaryCommand;
    if let DiagnosticError::CommandNotFound { diagnosis, .. } = err {
        reporter.info(&format!(
            "Checking whether '{}' is installed at {}",
            primary.name,
            primary.fallback_path.display()
        ));
        match diagnosis {
            CommandDiagnosis::PathMisconfigured { found_at } => {
                reporter.outcome(&CheckOutcome::warn(
                    stage,
                    format!(
                        "PATH misconfigured: '{}' is installed at {} but that directory is not on PATH",
                        primary.name,
                        found_at.display()
                    ),
                ));
                if let Some(dir) = found_at.parent() {
                    reporter.info(&format!(
                        "Fix: add {} to the PATH of the environment that runs the plugin",
                        dir.display()
                    ));
                }
            }
            CommandDiagnosis::NotInstalled { checked } => {
                reporter.outcome(&CheckOutcome::warn(
                    stage,
                    format!(
                        "Not installed: '{}' is missing from PATH and from {}",
                        primary.name,
                        checked.display()
                    ),
                ));
                reporter.info(&format!(
                    "Fix: install it, e.g. 'pip install {} --break-system-packages'",
                    primary.name
                ));
            }
        }
    }
    fail(reporter, err);
}

fn display_name(path: &std::path::Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}
