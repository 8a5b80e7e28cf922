//! End-to-end diagnostic run.
//!
//! Wires the gate sequencer and the lifecycle exerciser together. The
//! lifecycle only runs once every configuration gate has passed.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::ports::{DiagnosticReporter, ExecutableProbe, ManagedServer};

use super::config_validator::{ConfigValidator, PrimaryCommand};
use super::gate::DependencyGate;
use super::lifecycle::{DEFAULT_SETTLE_DELAY, LifecycleExerciser};
use super::report::{RunReport, TallyingReporter};

/// Tunables of a diagnostic run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticOptions {
    pub primary_command: PrimaryCommand,
    pub settle_delay: Duration,
}

impl Default for DiagnosticOptions {
    fn default() -> Self {
        Self {
            primary_command: PrimaryCommand::default(),
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }
}

/// Runs the staged diagnostic against one managed server.
pub struct DiagnosticService {
    probe: Arc<dyn ExecutableProbe>,
    server: Arc<dyn ManagedServer>,
    options: DiagnosticOptions,
}

impl DiagnosticService {
    pub fn new(
        probe: Arc<dyn ExecutableProbe>,
        server: Arc<dyn ManagedServer>,
        options: DiagnosticOptions,
    ) -> Self {
        Self {
            probe,
            server,
            options,
        }
    }

    /// Run every stage until completion or the first hard-gate failure.
    pub async fn run(&self, reporter: &mut dyn DiagnosticReporter) -> RunReport {
        let mut reporter = TallyingReporter::new(reporter);
        let config = self.server.config();

        let validator = ConfigValidator::new(config, self.probe.as_ref());
        let mut gate = DependencyGate::new(validator, &self.options.primary_command);
        let summary = match gate.run(&mut reporter) {
            Ok(summary) => summary,
            Err(err) => {
                warn!(stage = %err.stage(), error = %err, "Configuration gate failed");
                return RunReport::failed(err, reporter.tally());
            }
        };
        info!(
            servers = summary.manifest.servers().len(),
            unresolved = summary.unresolved_dependencies,
            "Configuration gates passed"
        );

        reporter.info("All configuration checks passed; exercising the plugin's server management");
        let exerciser = LifecycleExerciser::new(self.server.as_ref())
            .with_settle_delay(self.options.settle_delay);
        match exerciser.run(&mut reporter).await {
            Ok(_) => RunReport::success(reporter.tally()),
            Err(err) => {
                warn!(stage = %err.stage(), error = %err, "Lifecycle step failed");
                RunReport::failed(err, reporter.tally())
            }
        }
    }
}
