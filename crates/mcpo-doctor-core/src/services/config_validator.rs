//! Configuration validation stages.
//!
//! Each operation is read-only: it inspects the snapshot, the manifest file
//! and the search path, and reports what it found.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::{CheckOutcome, PluginConfig, ServerManifest, Stage};
use crate::error::{CommandDiagnosis, DiagnosticError};
use crate::ports::ExecutableProbe;

/// Launcher the plugin runs to bring the gateway up.
pub const PRIMARY_COMMAND: &str = "mcpo";

/// Install location checked when the launcher is missing from PATH.
pub const PRIMARY_COMMAND_FALLBACK: &str = "/usr/src/app/pydeps/bin/mcpo";

/// The launcher to resolve and where to look when PATH lookup fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryCommand {
    pub name: String,
    pub fallback_path: PathBuf,
}

impl PrimaryCommand {
    pub fn new(name: impl Into<String>, fallback_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            fallback_path: fallback_path.into(),
        }
    }
}

impl Default for PrimaryCommand {
    fn default() -> Self {
        Self::new(PRIMARY_COMMAND, PRIMARY_COMMAND_FALLBACK)
    }
}

/// Result of resolving one manifest entry's command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyStatus {
    /// The entry declares no `command`.
    Undeclared,
    /// The command resolved to this path.
    Resolved(PathBuf),
    /// The command was not found.
    Unresolved,
}

/// One checked manifest entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyCheck {
    pub server: String,
    pub command: Option<String>,
    pub status: DependencyStatus,
}

impl DependencyCheck {
    /// Per-entry outcome for the dependency stage.
    pub fn to_outcome(&self) -> CheckOutcome {
        let stage = Stage::CheckDependencies;
        match (&self.status, self.command.as_deref()) {
            (DependencyStatus::Resolved(path), Some(command)) => CheckOutcome::pass(
                stage,
                format!(
                    "Dependency '{command}' (for {}) found on PATH: {}",
                    self.server,
                    path.display()
                ),
            ),
            (DependencyStatus::Unresolved, Some(command)) => CheckOutcome::fail(
                stage,
                DiagnosticError::DependencyUnresolved {
                    server: self.server.clone(),
                    command: command.to_string(),
                }
                .to_string(),
            ),
            _ => CheckOutcome::warn(
                stage,
                format!("Server '{}' does not define a 'command'", self.server),
            ),
        }
    }
}

/// All entries checked by the dependency stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyReport {
    pub checks: Vec<DependencyCheck>,
    /// `false` when the manifest had no servers to validate.
    pub had_servers: bool,
}

impl DependencyReport {
    pub fn unresolved(&self) -> usize {
        self.checks
            .iter()
            .filter(|check| check.status == DependencyStatus::Unresolved)
            .count()
    }

    pub fn undeclared(&self) -> usize {
        self.checks
            .iter()
            .filter(|check| check.status == DependencyStatus::Undeclared)
            .count()
    }

    /// Entries that declare a command.
    pub fn declared(&self) -> usize {
        self.checks.len() - self.undeclared()
    }

    /// Whether every declared command resolved.
    pub fn all_resolved(&self) -> bool {
        self.unresolved() == 0
    }

    /// Every outcome of the stage: one per entry, then the summary.
    ///
    /// With no servers declared the stage reports a single warning.
    pub fn outcomes(&self) -> Vec<CheckOutcome> {
        let stage = Stage::CheckDependencies;
        if !self.had_servers {
            return vec![CheckOutcome::warn(
                stage,
                "mcpServers is empty or missing; no servers to validate",
            )];
        }

        let mut outcomes: Vec<CheckOutcome> =
            self.checks.iter().map(DependencyCheck::to_outcome).collect();

        let unresolved = self.unresolved();
        let declared = self.declared();
        outcomes.push(if declared == 0 {
            CheckOutcome::warn(
                stage,
                format!(
                    "None of the {} server(s) declares a command; nothing was resolved",
                    self.checks.len()
                ),
            )
        } else if unresolved == 0 {
            CheckOutcome::pass(
                stage,
                format!("All {declared} declared server command(s) resolved"),
            )
        } else {
            CheckOutcome::fail(
                stage,
                format!(
                    "{unresolved} of {declared} declared server command(s) not found; the MCPO server may fail to start"
                ),
            )
        });
        outcomes
    }
}

/// Validator for the plugin configuration and its dependencies.
pub struct ConfigValidator<'a> {
    config: &'a PluginConfig,
    probe: &'a dyn ExecutableProbe,
}

impl<'a> ConfigValidator<'a> {
    pub fn new(config: &'a PluginConfig, probe: &'a dyn ExecutableProbe) -> Self {
        Self { config, probe }
    }

    /// Confirm the manifest path exists.
    pub fn locate_config(&self) -> Result<&'a Path, DiagnosticError> {
        let path = self.config.config_path.as_path();
        if path.exists() {
            Ok(path)
        } else {
            Err(DiagnosticError::ConfigMissing {
                path: path.to_path_buf(),
            })
        }
    }

    /// Read and parse the manifest.
    pub fn parse_config(&self) -> Result<ServerManifest, DiagnosticError> {
        let path = self.config.config_path.as_path();
        let content = fs::read_to_string(path).map_err(|source| {
            DiagnosticError::ConfigUnreadable {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let document: serde_json::Value = serde_json::from_str(&content)
            .map_err(|err| DiagnosticError::malformed(path, &err))?;

        Ok(ServerManifest::from_document(&document))
    }

    /// Resolve every declared server command.
    ///
    /// Entries are independent: an unresolved command never stops the
    /// remaining entries from being checked.
    pub fn check_dependencies(&self, manifest: &ServerManifest) -> DependencyReport {
        let checks = manifest
            .servers()
            .iter()
            .map(|entry| {
                let status = match entry.command.as_deref() {
                    None => DependencyStatus::Undeclared,
                    Some(command) => self
                        .probe
                        .which(command)
                        .map_or(DependencyStatus::Unresolved, DependencyStatus::Resolved),
                };
                debug!(server = %entry.name, command = ?entry.command, status = ?status, "Checked server dependency");
                DependencyCheck {
                    server: entry.name.clone(),
                    command: entry.command.clone(),
                    status,
                }
            })
            .collect();

        DependencyReport {
            checks,
            had_servers: manifest.declares_servers(),
        }
    }

    /// Resolve the configured interpreter.
    pub fn check_interpreter(&self) -> Result<PathBuf, DiagnosticError> {
        let executable = &self.config.python_executable;
        self.probe
            .which(executable)
            .ok_or_else(|| DiagnosticError::InterpreterNotFound {
                executable: executable.clone(),
            })
    }

    /// Resolve the gateway launcher, diagnosing why it is missing.
    pub fn check_primary_command(
        &self,
        primary: &PrimaryCommand,
    ) -> Result<PathBuf, DiagnosticError> {
        if let Some(path) = self.probe.which(&primary.name) {
            return Ok(path);
        }

        let diagnosis = if self.probe.file_exists(&primary.fallback_path) {
            CommandDiagnosis::PathMisconfigured {
                found_at: primary.fallback_path.clone(),
            }
        } else {
            CommandDiagnosis::NotInstalled {
                checked: primary.fallback_path.clone(),
            }
        };

        Err(DiagnosticError::CommandNotFound {
            command: primary.name.clone(),
            diagnosis,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ServerEntry, Verdict};
    use std::collections::{HashMap, HashSet};
    use std::io::Write;

    #[derive(Default)]
    struct FakeProbe {
        executables: HashMap<String, PathBuf>,
        files: HashSet<PathBuf>,
    }

    impl FakeProbe {
        fn with(mut self, name: &str) -> Self {
            self.executables
                .insert(name.to_string(), PathBuf::from("/usr/bin").join(name));
            self
        }

        fn with_file(mut self, path: &str) -> Self {
            self.files.insert(PathBuf::from(path));
            self
        }
    }

    impl ExecutableProbe for FakeProbe {
        fn which(&self, command: &str) -> Option<PathBuf> {
            self.executables.get(command).cloned()
        }

        fn file_exists(&self, path: &Path) -> bool {
            self.files.contains(path)
        }
    }

    fn entry(name: &str, command: Option<&str>) -> ServerEntry {
        ServerEntry {
            name: name.to_string(),
            command: command.map(ToString::to_string),
        }
    }

    fn write_manifest(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_locate_missing_config() {
        let config = PluginConfig::new(9000, "/definitely/not/here/mcp.json", "python3");
        let probe = FakeProbe::default();
        let validator = ConfigValidator::new(&config, &probe);

        let err = validator.locate_config().unwrap_err();
        assert!(matches!(err, DiagnosticError::ConfigMissing { .. }));
        assert!(err.to_string().contains("/definitely/not/here/mcp.json"));
    }

    #[test]
    fn test_parse_valid_manifest() {
        let file = write_manifest(r#"{"mcpServers": {"fs": {"command": "npx"}}}"#);
        let config = PluginConfig::new(9000, file.path(), "python3");
        let probe = FakeProbe::default();
        let validator = ConfigValidator::new(&config, &probe);

        assert_eq!(validator.locate_config().unwrap(), file.path());
        let manifest = validator.parse_config().unwrap();
        assert_eq!(manifest.servers(), [entry("fs", Some("npx"))]);
    }

    #[test]
    fn test_parse_malformed_manifest_reports_position() {
        let file = write_manifest("{\n  \"mcpServers\": {\n    \"fs\": }\n}");
        let config = PluginConfig::new(9000, file.path(), "python3");
        let probe = FakeProbe::default();
        let validator = ConfigValidator::new(&config, &probe);

        match validator.parse_config().unwrap_err() {
            DiagnosticError::ConfigMalformed { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_directory_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let config = PluginConfig::new(9000, dir.path(), "python3");
        let probe = FakeProbe::default();
        let validator = ConfigValidator::new(&config, &probe);

        assert!(validator.locate_config().is_ok());
        assert!(matches!(
            validator.parse_config().unwrap_err(),
            DiagnosticError::ConfigUnreadable { .. }
        ));
    }

    #[test]
    fn test_dependencies_all_resolved() {
        let config = PluginConfig::new(9000, "/tmp/mcp.json", "python3");
        let probe = FakeProbe::default().with("npx").with("uvx");
        let validator = ConfigValidator::new(&config, &probe);
        let manifest = ServerManifest::with_servers(vec![
            entry("fs", Some("npx")),
            entry("time", Some("uvx")),
        ]);

        let report = validator.check_dependencies(&manifest);
        assert!(report.all_resolved());
        let outcomes = report.outcomes();
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.iter().all(|o| o.verdict == Verdict::Pass));
    }

    #[test]
    fn test_one_unresolved_dependency_does_not_stop_the_others() {
        let config = PluginConfig::new(9000, "/tmp/mcp.json", "python3");
        let probe = FakeProbe::default().with("npx").with("uvx");
        let validator = ConfigValidator::new(&config, &probe);
        let manifest = ServerManifest::with_servers(vec![
            entry("fs", Some("npx")),
            entry("broken", Some("nonexistent-tool")),
            entry("time", Some("uvx")),
        ]);

        let report = validator.check_dependencies(&manifest);
        assert_eq!(report.unresolved(), 1);
        let verdicts: Vec<Verdict> = report.outcomes().iter().map(|o| o.verdict).collect();
        assert_eq!(
            verdicts,
            [Verdict::Pass, Verdict::Fail, Verdict::Pass, Verdict::Fail]
        );
    }

    #[test]
    fn test_missing_command_is_a_warning() {
        let config = PluginConfig::new(9000, "/tmp/mcp.json", "python3");
        let probe = FakeProbe::default();
        let validator = ConfigValidator::new(&config, &probe);
        let manifest = ServerManifest::with_servers(vec![entry("remote", None)]);

        let report = validator.check_dependencies(&manifest);
        assert_eq!(report.undeclared(), 1);
        let outcomes = report.outcomes();
        assert_eq!(outcomes[0].verdict, Verdict::Warn);
        assert_eq!(outcomes[1].verdict, Verdict::Warn);
        assert!(outcomes[1].message.contains("declares a command"));
    }

    #[test]
    fn test_summary_counts_only_declared_commands() {
        let config = PluginConfig::new(9000, "/tmp/mcp.json", "python3");
        let probe = FakeProbe::default().with("npx");
        let validator = ConfigValidator::new(&config, &probe);
        let manifest = ServerManifest::with_servers(vec![
            entry("fs", Some("npx")),
            entry("remote", None),
        ]);

        let outcomes = validator.check_dependencies(&manifest).outcomes();
        let summary = outcomes.last().unwrap();
        assert_eq!(summary.verdict, Verdict::Pass);
        assert_eq!(summary.message, "All 1 declared server command(s) resolved");
    }

    #[test]
    fn test_padded_or_blank_commands_are_unresolved() {
        let file = write_manifest(
            r#"{"mcpServers": {"fs": {"command": " npx "}, "blank": {"command": "   "}}}"#,
        );
        let config = PluginConfig::new(9000, file.path(), "python3");
        let probe = FakeProbe::default().with("npx");
        let validator = ConfigValidator::new(&config, &probe);

        let manifest = validator.parse_config().unwrap();
        let report = validator.check_dependencies(&manifest);
        assert_eq!(report.unresolved(), 2);
        assert_eq!(report.undeclared(), 0);
        let verdicts: Vec<Verdict> = report.outcomes().iter().map(|o| o.verdict).collect();
        assert_eq!(verdicts, [Verdict::Fail, Verdict::Fail, Verdict::Fail]);
    }

    #[test]
    fn test_no_servers_single_warning() {
        let config = PluginConfig::new(9000, "/tmp/mcp.json", "python3");
        let probe = FakeProbe::default();
        let validator = ConfigValidator::new(&config, &probe);

        let report = validator.check_dependencies(&ServerManifest::default());
        let outcomes = report.outcomes();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].verdict, Verdict::Warn);
        assert!(outcomes[0].message.contains("no servers to validate"));
    }

    #[test]
    fn test_interpreter_lookup() {
        let config = PluginConfig::new(9000, "/tmp/mcp.json", "python3");
        let validator_probe = FakeProbe::default().with("python3");
        let validator = ConfigValidator::new(&config, &validator_probe);
        assert_eq!(
            validator.check_interpreter().unwrap(),
            PathBuf::from("/usr/bin/python3")
        );

        let empty = FakeProbe::default();
        let validator = ConfigValidator::new(&config, &empty);
        assert!(matches!(
            validator.check_interpreter().unwrap_err(),
            DiagnosticError::InterpreterNotFound { .. }
        ));
    }

    #[test]
    fn test_primary_command_diagnoses() {
        let config = PluginConfig::new(9000, "/tmp/mcp.json", "python3");
        let primary = PrimaryCommand::default();

        let on_path = FakeProbe::default().with("mcpo");
        let validator = ConfigValidator::new(&config, &on_path);
        assert!(validator.check_primary_command(&primary).is_ok());

        let off_path = FakeProbe::default().with_file(PRIMARY_COMMAND_FALLBACK);
        let validator = ConfigValidator::new(&config, &off_path);
        match validator.check_primary_command(&primary).unwrap_err() {
            DiagnosticError::CommandNotFound { diagnosis, .. } => assert!(matches!(
                diagnosis,
                CommandDiagnosis::PathMisconfigured { .. }
            )),
            other => panic!("unexpected error: {other:?}"),
        }

        let missing = FakeProbe::default();
        let validator = ConfigValidator::new(&config, &missing);
        match validator.check_primary_command(&primary).unwrap_err() {
            DiagnosticError::CommandNotFound { diagnosis, .. } => {
                assert!(matches!(diagnosis, CommandDiagnosis::NotInstalled { .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
