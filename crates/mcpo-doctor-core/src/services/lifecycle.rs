//! Lifecycle exerciser.
//!
//! Drives the managed server through stop, settle, start, health check,
//! tool listing and stop. Every step goes through the same contract: invoke,
//! capture the result or fault, classify, report one outcome.

use std::fmt::Write as _;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::{CheckOutcome, ServerAction, Stage, StepResult, StepVerdict};
use crate::error::DiagnosticError;
use crate::ports::{DiagnosticReporter, ManagedServer};

/// Wait between the forced stop and the start, so the OS can release the port.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(2);

/// The hard-gated steps after the initial stop, in order.
const GATED_STEPS: [Stage; 4] = [
    Stage::Start,
    Stage::HealthCheck,
    Stage::ListTools,
    Stage::FinalStop,
];

/// Outcome of running one step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepRun {
    pub stage: Stage,
    /// Raw result, absent when the call raised a fault.
    pub result: Option<StepResult>,
    pub succeeded: bool,
    /// Why the step failed, if it did.
    pub reason: Option<String>,
}

/// Drives the managed server through its lifecycle.
pub struct LifecycleExerciser<'a> {
    server: &'a dyn ManagedServer,
    settle_delay: Duration,
}

impl<'a> LifecycleExerciser<'a> {
    pub fn new(server: &'a dyn ManagedServer) -> Self {
        Self {
            server,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }

    #[must_use]
    pub const fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Run the whole sequence, halting on the first failed hard-gated step.
    pub async fn run(
        &self,
        reporter: &mut dyn DiagnosticReporter,
    ) -> Result<Vec<StepRun>, DiagnosticError> {
        let mut runs = Vec::with_capacity(GATED_STEPS.len() + 1);

        let initial = self.run_step(Stage::InitialStop, reporter).await;
        if !initial.succeeded {
            debug!(reason = ?initial.reason, "Initial stop did not succeed; continuing");
        }
        runs.push(initial);

        if !self.settle_delay.is_zero() {
            reporter.info(&format!(
                "Waiting {}s for the port to be released",
                self.settle_delay.as_secs_f32()
            ));
            tokio::time::sleep(self.settle_delay).await;
        }

        for stage in GATED_STEPS {
            let run = self.run_step(stage, reporter).await;
            if !run.succeeded {
                let reason = run
                    .reason
                    .clone()
                    .unwrap_or_else(|| "step failed".to_string());
                return Err(DiagnosticError::LifecycleStepFailed {
                    step: stage,
                    reason,
                });
            }
            runs.push(run);
        }

        Ok(runs)
    }

    /// Invoke one step and report its outcome.
    pub async fn run_step(&self, stage: Stage, reporter: &mut dyn DiagnosticReporter) -> StepRun {
        reporter.stage_started(stage);

        let run = match self.invoke(stage).await {
            Ok(result) => {
                match serde_json::to_string_pretty(&result) {
                    Ok(raw) => reporter.info(&format!("Raw result: {raw}")),
                    Err(err) => debug!(error = %err, "Could not render step result"),
                }
                classify_result(stage, result)
            }
            Err(fault) => {
                warn!(stage = %stage, error = %fault, "Lifecycle step raised a fault");
                StepRun {
                    stage,
                    result: None,
                    succeeded: false,
                    reason: Some(describe_fault(&fault)),
                }
            }
        };

        reporter.outcome(&step_outcome(&run));
        run
    }

    async fn invoke(&self, stage: Stage) -> anyhow::Result<StepResult> {
        match stage {
            Stage::Start => self.server.manage_server(ServerAction::Start).await,
            Stage::HealthCheck => self.server.health_check().await,
            Stage::ListTools => self.server.list_tools().await,
            Stage::InitialStop | Stage::FinalStop => {
                self.server.manage_server(ServerAction::Stop).await
            }
            other => anyhow::bail!("{other} is not a lifecycle step"),
        }
    }
}

fn classify_result(stage: Stage, result: StepResult) -> StepRun {
    let (succeeded, reason) = match result.classify() {
        StepVerdict::Succeeded => (true, None),
        StepVerdict::Failed => (
            false,
            Some(
                result
                    .message
                    .clone()
                    .or_else(|| result.status.clone())
                    .unwrap_or_else(|| "reported failure".to_string()),
            ),
        ),
        StepVerdict::Unrecognized => (
            false,
            Some("result carries neither a 'success' flag nor a 'status' field".to_string()),
        ),
    };

    StepRun {
        stage,
        result: Some(result),
        succeeded,
        reason,
    }
}

/// Render a fault with its full cause chain.
fn describe_fault(fault: &anyhow::Error) -> String {
    let mut description = format!("raised an error: {fault}");
    for cause in fault.chain().skip(1) {
        let _ = write!(description, "\n    caused by: {cause}");
    }
    description
}

fn step_outcome(run: &StepRun) -> CheckOutcome {
    let title = run.stage.title();
    if run.succeeded {
        return CheckOutcome::pass(run.stage, format!("{title} succeeded"));
    }

    let reason = run.reason.as_deref().unwrap_or("failed");
    if run.stage == Stage::InitialStop {
        CheckOutcome::warn(
            run.stage,
            format!("Initial stop did not succeed ({reason}); this is normal when the server was not running"),
        )
    } else {
        CheckOutcome::fail(run.stage, format!("{title} failed: {reason}"))
    }
}
