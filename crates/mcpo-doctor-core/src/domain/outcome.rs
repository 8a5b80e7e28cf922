//! Check outcomes and the stages that produce them.

use std::fmt;

use serde::Serialize;

/// Tri-state verdict of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Warn,
    Fail,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Warn => write!(f, "WARN"),
            Self::Fail => write!(f, "FAIL"),
        }
    }
}

/// Every stage of a diagnostic run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    LocateConfig,
    ParseConfig,
    CheckDependencies,
    CheckInterpreter,
    CheckPrimaryCommand,
    InitialStop,
    Start,
    HealthCheck,
    ListTools,
    FinalStop,
}

impl Stage {
    /// All stages in the order a full run executes them.
    pub const ALL: [Self; 10] = [
        Self::LocateConfig,
        Self::ParseConfig,
        Self::CheckDependencies,
        Self::CheckInterpreter,
        Self::CheckPrimaryCommand,
        Self::InitialStop,
        Self::Start,
        Self::HealthCheck,
        Self::ListTools,
        Self::FinalStop,
    ];

    /// Stable machine-readable name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::LocateConfig => "locate_config",
            Self::ParseConfig => "parse_config",
            Self::CheckDependencies => "check_dependencies",
            Self::CheckInterpreter => "check_interpreter",
            Self::CheckPrimaryCommand => "command-check",
            Self::InitialStop => "initial_stop",
            Self::Start => "start",
            Self::HealthCheck => "health_check",
            Self::ListTools => "list_tools",
            Self::FinalStop => "final_stop",
        }
    }

    /// Human-readable heading printed before the stage runs.
    pub const fn title(self) -> &'static str {
        match self {
            Self::LocateConfig => "Check 'MCP_CONFIG_PATH'",
            Self::ParseConfig => "Check manifest syntax",
            Self::CheckDependencies => "Check manifest server commands",
            Self::CheckInterpreter => "Check 'PYTHON_EXECUTABLE'",
            Self::CheckPrimaryCommand => "Check the 'mcpo' executable",
            Self::InitialStop => "Clean up (stop)",
            Self::Start => "Start server",
            Self::HealthCheck => "Health check",
            Self::ListTools => "List tools",
            Self::FinalStop => "Stop server",
        }
    }

    /// Whether a failure at this stage halts the run.
    ///
    /// The dependency stage reports per-entry failures but never halts, and
    /// the initial stop is expected to fail when nothing is running.
    pub const fn is_hard_gate(self) -> bool {
        !matches!(self, Self::CheckDependencies | Self::InitialStop)
    }

    /// Whether the stage exercises the live server.
    pub const fn is_lifecycle(self) -> bool {
        matches!(
            self,
            Self::InitialStop | Self::Start | Self::HealthCheck | Self::ListTools | Self::FinalStop
        )
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of one check, as shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckOutcome {
    pub stage: Stage,
    pub verdict: Verdict,
    pub message: String,
}

impl CheckOutcome {
    pub fn pass(stage: Stage, message: impl Into<String>) -> Self {
        Self::new(stage, Verdict::Pass, message)
    }

    pub fn warn(stage: Stage, message: impl Into<String>) -> Self {
        Self::new(stage, Verdict::Warn, message)
    }

    pub fn fail(stage: Stage, message: impl Into<String>) -> Self {
        Self::new(stage, Verdict::Fail, message)
    }

    fn new(stage: Stage, verdict: Verdict, message: impl Into<String>) -> Self {
        Self {
            stage,
            verdict,
            message: message.into(),
        }
    }

    pub fn is_fail(&self) -> bool {
        self.verdict == Verdict::Fail
    }
}
