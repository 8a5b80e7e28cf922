//! Console rendering of a diagnostic run.
//!
//! Every stage prints a header, then one line per verdict. Formatting lives
//! in pure functions so it can be tested without a terminal.

use std::io::{self, Stdout, Write};

use mcpo_doctor_core::{
    CheckOutcome, DiagnosticReporter, PluginConfig, RunReport, Stage, Verdict,
};

// ANSI color codes
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Name of the configuration loading step shown before the stages.
pub const LOAD_CONFIG_STEP: &str = "load_plugin_config";

/// Writes the verdict stream to a terminal (or any writer).
pub struct ConsoleReporter<W: Write = Stdout> {
    out: W,
    color: bool,
}

impl ConsoleReporter<Stdout> {
    pub fn stdout(color: bool) -> Self {
        Self::new(io::stdout(), color)
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub const fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Echo a loaded configuration snapshot.
    pub fn config_loaded(&mut self, config: &PluginConfig) {
        self.line(&format_header(1, "Load plugin configuration", LOAD_CONFIG_STEP, self.color));
        self.line(&format_verdict(
            Verdict::Pass,
            "Plugin configuration loaded",
            self.color,
        ));
        for line in format_config(config) {
            self.line(&format_info(&line));
        }
    }

    /// Report a configuration that could not be loaded.
    pub fn config_failed(&mut self, error: &dyn std::error::Error) {
        self.line(&format_header(1, "Load plugin configuration", LOAD_CONFIG_STEP, self.color));
        self.line(&format_verdict(
            Verdict::Fail,
            &format!("Could not load the plugin configuration: {error}"),
            self.color,
        ));
        self.line(&format!(
            "\nDiagnostics stopped at stage '{LOAD_CONFIG_STEP}'. Fix the configuration error above and run again."
        ));
    }

    /// Closing banner of a run.
    pub fn finish(&mut self, report: &RunReport) {
        let banner = report.banner();
        let text = match (self.color, report.is_success()) {
            (true, true) => format!("{GREEN}{BOLD}{banner}{RESET}"),
            (true, false) => format!("{RED}{BOLD}{banner}{RESET}"),
            (false, _) => banner,
        };
        self.line(&format!("\n{text}"));
    }

    fn line(&mut self, text: &str) {
        // A closed stdout must not abort the diagnostic.
        let _ = writeln!(self.out, "{text}");
    }
}

impl<W: Write> DiagnosticReporter for ConsoleReporter<W> {
    fn stage_started(&mut self, stage: Stage) {
        let text = format_stage_header(stage, self.color);
        self.line(&text);
    }

    fn info(&mut self, message: &str) {
        self.line(&format_info(message));
    }

    fn outcome(&mut self, outcome: &CheckOutcome) {
        let text = format_outcome(outcome, self.color);
        self.line(&text);
    }
}

/// Position of a stage in the printed numbering (configuration loading is 1).
pub fn stage_number(stage: Stage) -> usize {
    Stage::ALL
        .iter()
        .position(|s| *s == stage)
        .map_or(0, |index| index + 2)
}

pub fn format_stage_header(stage: Stage, color: bool) -> String {
    format_header(stage_number(stage), stage.title(), stage.name(), color)
}

fn format_header(number: usize, title: &str, name: &str, color: bool) -> String {
    let text = format!("--- Test {number}: {title} [{name}] ---");
    if color {
        format!("\n{BOLD}{text}{RESET}")
    } else {
        format!("\n{text}")
    }
}

pub fn format_outcome(outcome: &CheckOutcome, color: bool) -> String {
    format_verdict(outcome.verdict, &outcome.message, color)
}

fn format_verdict(verdict: Verdict, message: &str, color: bool) -> String {
    let (icon, paint) = match verdict {
        Verdict::Pass => ("✅", GREEN),
        Verdict::Warn => ("⚠️ ", YELLOW),
        Verdict::Fail => ("❌", RED),
    };
    if color {
        format!("{icon} {paint}[{verdict}]{RESET} {message}")
    } else {
        format!("{icon} [{verdict}] {message}")
    }
}

/// Informational line; continuation lines are indented under the first.
pub fn format_info(message: &str) -> String {
    let mut lines = message.lines();
    let first = lines.next().unwrap_or_default();
    let mut text = format!("ℹ️  [INFO] {first}");
    for line in lines {
        text.push_str("\n          ");
        text.push_str(line);
    }
    text
}

/// Configuration echo lines.
pub fn format_config(config: &PluginConfig) -> Vec<String> {
    let mut lines = vec![
        format!("  > MCPO port: {}", config.port),
        format!("  > Config file path: {}", config.config_path.display()),
        format!("  > Python executable: {}", config.python_executable),
        format!(
            "  > Startup timeout: {}s",
            config.startup_timeout.as_secs()
        ),
    ];
    if config.api_key.is_some() {
        lines.push("  > API key: set".to_string());
    }
    lines
}
