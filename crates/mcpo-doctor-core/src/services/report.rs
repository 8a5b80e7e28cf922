//! Result reporter: folds stage outcomes into one terminal verdict.

use crate::domain::{CheckOutcome, Stage, Verdict};
use crate::error::DiagnosticError;
use crate::ports::DiagnosticReporter;

/// Process exit code of a fully successful run.
pub const EXIT_SUCCESS: u8 = 0;

/// Process exit code of a run halted by a hard gate.
pub const EXIT_FAILURE: u8 = 1;

/// Count of outcomes by verdict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeTally {
    pub passed: usize,
    pub warned: usize,
    pub failed: usize,
}

impl OutcomeTally {
    pub const fn record(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Pass => self.passed += 1,
            Verdict::Warn => self.warned += 1,
            Verdict::Fail => self.failed += 1,
        }
    }

    pub const fn total(&self) -> usize {
        self.passed + self.warned + self.failed
    }
}

/// Forwards events to another reporter while counting outcomes.
pub struct TallyingReporter<'r> {
    inner: &'r mut dyn DiagnosticReporter,
    tally: OutcomeTally,
}

impl<'r> TallyingReporter<'r> {
    pub fn new(inner: &'r mut dyn DiagnosticReporter) -> Self {
        Self {
            inner,
            tally: OutcomeTally::default(),
        }
    }

    pub const fn tally(&self) -> OutcomeTally {
        self.tally
    }
}

impl DiagnosticReporter for TallyingReporter<'_> {
    fn stage_started(&mut self, stage: Stage) {
        self.inner.stage_started(stage);
    }

    fn info(&mut self, message: &str) {
        self.inner.info(message);
    }

    fn outcome(&mut self, outcome: &CheckOutcome) {
        self.tally.record(outcome.verdict);
        self.inner.outcome(outcome);
    }
}

/// Terminal status of a run.
#[derive(Debug)]
pub enum RunStatus {
    Success,
    Failed(DiagnosticError),
}

/// Summary of a complete diagnostic run.
#[derive(Debug)]
pub struct RunReport {
    pub status: RunStatus,
    pub tally: OutcomeTally,
}

impl RunReport {
    pub const fn success(tally: OutcomeTally) -> Self {
        Self {
            status: RunStatus::Success,
            tally,
        }
    }

    pub const fn failed(error: DiagnosticError, tally: OutcomeTally) -> Self {
        Self {
            status: RunStatus::Failed(error),
            tally,
        }
    }

    pub const fn is_success(&self) -> bool {
        matches!(self.status, RunStatus::Success)
    }

    /// Stage that halted the run, if any.
    pub const fn failed_stage(&self) -> Option<Stage> {
        match &self.status {
            RunStatus::Success => None,
            RunStatus::Failed(err) => Some(err.stage()),
        }
    }

    pub const fn exit_code(&self) -> u8 {
        if self.is_success() {
            EXIT_SUCCESS
        } else {
            EXIT_FAILURE
        }
    }

    /// Closing banner shown after the last stage.
    pub fn banner(&self) -> String {
        match &self.status {
            RunStatus::Success => format!(
                "All checks passed ({} passed, {} warnings). The MCPO plugin is configured \
                 correctly: the server starts, communicates and shuts down.",
                self.tally.passed, self.tally.warned
            ),
            RunStatus::Failed(err) => format!(
                "Diagnostics stopped at stage '{}'. {}\n{err}",
                err.stage(),
                failure_hint(err.stage())
            ),
        }
    }
}

/// What a failure at `stage` means for the operator.
pub const fn failure_hint(stage: Stage) -> &'static str {
    match stage {
        Stage::LocateConfig
        | Stage::ParseConfig
        | Stage::CheckDependencies
        | Stage::CheckInterpreter
        | Stage::CheckPrimaryCommand => "Fix the configuration error above and run again.",
        Stage::InitialStop | Stage::Start => {
            "The MCPO server could not be started even though every configuration check passed."
        }
        Stage::HealthCheck => "The server started, but the health check failed.",
        Stage::ListTools => "The server is healthy, but its tools could not be listed.",
        Stage::FinalStop => "All checks ran, but stopping the server failed.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::RecordingReporter;
    use std::path::PathBuf;

    #[test]
    fn test_tallying_reporter_counts_and_forwards() {
        let mut inner = RecordingReporter::new();
        let mut tallying = TallyingReporter::new(&mut inner);
        tallying.outcome(&CheckOutcome::pass(Stage::LocateConfig, "ok"));
        tallying.outcome(&CheckOutcome::warn(Stage::CheckDependencies, "hmm"));
        tallying.outcome(&CheckOutcome::fail(Stage::CheckInterpreter, "no"));
        let tally = tallying.tally();

        assert_eq!(tally.total(), 3);
        assert_eq!((tally.passed, tally.warned, tally.failed), (1, 1, 1));
        assert_eq!(inner.outcomes().len(), 3);
    }

    #[test]
    fn test_success_report() {
        let report = RunReport::success(OutcomeTally {
            passed: 9,
            warned: 1,
            failed: 0,
        });
        assert!(report.is_success());
        assert_eq!(report.exit_code(), EXIT_SUCCESS);
        assert_eq!(report.failed_stage(), None);
        assert!(report.banner().starts_with("All checks passed"));
    }

    #[test]
    fn test_failure_report_names_stage() {
        let report = RunReport::failed(
            DiagnosticError::ConfigMissing {
                path: PathBuf::from("/srv/mcp-config.json"),
            },
            OutcomeTally::default(),
        );
        assert_eq!(report.exit_code(), EXIT_FAILURE);
        assert_eq!(report.failed_stage(), Some(Stage::LocateConfig));
        let banner = report.banner();
        assert!(banner.contains("locate_config"));
        assert!(banner.contains("/srv/mcp-config.json"));
    }
}
