//! Reporting port.
//!
//! Stages push their verdicts through this port as soon as they complete, so
//! a halted run's last reported outcome always names the failing stage.

use crate::domain::{CheckOutcome, Stage};

/// Receives progress and verdicts from a diagnostic run.
pub trait DiagnosticReporter {
    /// A stage is about to run.
    fn stage_started(&mut self, stage: Stage);

    /// Informational line (configuration echo, raw step results, hints).
    fn info(&mut self, message: &str);

    /// A check completed.
    fn outcome(&mut self, outcome: &CheckOutcome);
}

/// Event captured by [`RecordingReporter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEvent {
    StageStarted(Stage),
    Info(String),
    Outcome(CheckOutcome),
}

/// Reporter that keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub events: Vec<ReportEvent>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outcomes in the order they were reported.
    pub fn outcomes(&self) -> Vec<&CheckOutcome> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ReportEvent::Outcome(outcome) => Some(outcome),
                _ => None,
            })
            .collect()
    }

    /// Outcomes reported by one stage.
    pub fn outcomes_for(&self, stage: Stage) -> Vec<&CheckOutcome> {
        self.outcomes()
            .into_iter()
            .filter(|outcome| outcome.stage == stage)
            .collect()
    }

    /// Stages that started, in order.
    pub fn stages(&self) -> Vec<Stage> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ReportEvent::StageStarted(stage) => Some(*stage),
                _ => None,
            })
            .collect()
    }
}

impl DiagnosticReporter for RecordingReporter {
    fn stage_started(&mut self, stage: Stage) {
        self.events.push(ReportEvent::StageStarted(stage));
    }

    fn info(&mut self, message: &str) {
        self.events.push(ReportEvent::Info(message.to_string()));
    }

    fn outcome(&mut self, outcome: &CheckOutcome) {
        self.events.push(ReportEvent::Outcome(outcome.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_reporter_filters() {
        let mut reporter = RecordingReporter::new();
        reporter.stage_started(Stage::LocateConfig);
        reporter.info("hello");
        reporter.outcome(&CheckOutcome::pass(Stage::LocateConfig, "found"));
        reporter.stage_started(Stage::ParseConfig);
        reporter.outcome(&CheckOutcome::fail(Stage::ParseConfig, "bad"));

        assert_eq!(reporter.stages(), [Stage::LocateConfig, Stage::ParseConfig]);
        assert_eq!(reporter.outcomes().len(), 2);
        assert_eq!(reporter.outcomes_for(Stage::ParseConfig).len(), 1);
    }
}
