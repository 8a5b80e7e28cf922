//! The MCPO plugin: owns the gateway process and talks to it over HTTP.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use mcpo_doctor_core::{
    ManagedServer, PluginConfig, SUCCESS_STATUS, ServerAction, ServerManifest, StepResult,
};
use mcpo_doctor_resolver::resolve_executable;
use reqwest::Client;
use serde_json::{Map, Value, json};
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::health::{self, Readiness};
use crate::paths;
use crate::pidfile::{self, PidFileData};
use crate::process::{self, DEFAULT_GRACE_PERIOD};
use crate::tools;

/// Launcher spawned by `start`.
const LAUNCHER: &str = "mcpo";

/// Loopback-only bind address for the gateway.
const BIND_HOST: &str = "127.0.0.1";

/// Managed MCPO gateway.
///
/// At most one gateway process is owned at a time. The child is killed if
/// the plugin is dropped while it is still running.
pub struct McpoPlugin {
    config: PluginConfig,
    launcher: String,
    pids_dir: PathBuf,
    grace: Duration,
    client: Client,
    child: Mutex<Option<Child>>,
}

impl McpoPlugin {
    /// Plugin with PID files in the default state directory.
    pub fn new(config: PluginConfig) -> Result<Self> {
        let pids_dir = paths::pids_dir()?;
        Self::with_pids_dir(config, pids_dir)
    }

    pub fn with_pids_dir(config: PluginConfig, pids_dir: impl Into<PathBuf>) -> Result<Self> {
        let client = health::http_client().context("Failed to build HTTP client")?;
        Ok(Self {
            config,
            launcher: LAUNCHER.to_string(),
            pids_dir: pids_dir.into(),
            grace: DEFAULT_GRACE_PERIOD,
            client,
            child: Mutex::new(None),
        })
    }

    /// Spawn `launcher` instead of `mcpo`.
    #[must_use]
    pub fn with_launcher(mut self, launcher: impl Into<String>) -> Self {
        self.launcher = launcher.into();
        self
    }

    /// Time the gateway gets to exit after SIGTERM.
    #[must_use]
    pub const fn with_grace_period(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    pub fn pidfile_path(&self) -> PathBuf {
        pidfile::pidfile_path(&self.pids_dir, self.config.port)
    }

    /// Arguments passed to the launcher.
    pub fn launch_args(&self) -> Vec<String> {
        let mut args = vec![
            "--host".to_string(),
            BIND_HOST.to_string(),
            "--port".to_string(),
            self.config.port.to_string(),
            "--config".to_string(),
            self.config.config_path.display().to_string(),
        ];
        if let Some(key) = &self.config.api_key {
            args.push("--api-key".to_string());
            args.push(key.clone());
        }
        args
    }

    fn api_key(&self) -> Option<&str> {
        self.config.api_key.as_deref()
    }

    async fn start(&self) -> Result<StepResult> {
        let mut slot = self.child.lock().await;
        if let Some(child) = slot.as_mut() {
            if child.try_wait()?.is_none() {
                let pid = child.id().map_or_else(|| "?".to_string(), |p| p.to_string());
                return Ok(StepResult::failed(
                    "already_running",
                    format!("MCPO server is already running (pid {pid})"),
                ));
            }
            *slot = None;
        }

        let launcher = match resolve_executable(&self.launcher) {
            Ok(resolved) => resolved.resolved_path,
            Err(err) => return Ok(StepResult::failed("launcher_missing", err.to_string())),
        };

        let port = self.config.port;
        let mut child = Command::new(&launcher)
            .args(self.launch_args())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("Failed to spawn {}", launcher.display()))?;
        let pid = child.id();
        info!(launcher = %launcher.display(), ?pid, port, "Spawned MCPO server");

        if let Some(pid) = pid {
            if let Err(e) = pidfile::write_pidfile(&self.pids_dir, PidFileData { pid, port }) {
                warn!(error = %e, "Failed to write PID file");
            }
        }

        let base_url = self.config.base_url();
        let waited = health::wait_until_ready(
            &self.client,
            &base_url,
            self.api_key(),
            self.config.startup_timeout,
            || child.try_wait(),
        )
        .await;
        let readiness = match waited {
            Ok(readiness) => readiness,
            Err(e) => {
                self.abandon_start(child).await;
                return Err(e).context("Failed to watch MCPO server during startup");
            }
        };

        match readiness {
            Readiness::Ready => {
                *slot = Some(child);
                Ok(StepResult::succeeded(format!(
                    "MCPO server started on port {port}"
                ))
                .with_data(json!({ "pid": pid, "port": port, "url": base_url })))
            }
            Readiness::Exited(status) => {
                remove_pidfile(&self.pidfile_path());
                Ok(StepResult::failed(
                    "exited",
                    format!("MCPO server exited during startup ({status})"),
                ))
            }
            Readiness::TimedOut => {
                self.abandon_start(child).await;
                Ok(StepResult::failed(
                    "timeout",
                    format!(
                        "MCPO server did not answer {} within {}s",
                        health::docs_url(&base_url),
                        self.config.startup_timeout.as_secs()
                    ),
                ))
            }
        }
    }

    /// Stop and reap a gateway that never became ready, and forget its PID.
    async fn abandon_start(&self, child: Child) {
        if let Err(e) = process::shutdown_child(child, self.grace).await {
            warn!(error = %e, "Failed to stop MCPO server after a failed start");
        }
        remove_pidfile(&self.pidfile_path());
    }

    async fn stop(&self) -> Result<StepResult> {
        let owned = self.child.lock().await.take();
        let path = self.pidfile_path();

        if let Some(child) = owned {
            let pid = child.id();
            let status = process::shutdown_child(child, self.grace)
                .await
                .context("Failed to stop MCPO server")?;
            remove_pidfile(&path);
            info!(?pid, %status, "Stopped MCPO server");
            return Ok(
                StepResult::succeeded(format!("MCPO server stopped ({status})"))
                    .with_data(json!({ "pid": pid })),
            );
        }

        match pidfile::read_pidfile(&path) {
            Ok(data)
                if process::pid_exists(data.pid)
                    && process::is_launcher_process(data.pid, &self.launcher) =>
            {
                process::kill_pid(data.pid, self.grace)
                    .await
                    .with_context(|| format!("Failed to stop MCPO server (pid {})", data.pid))?;
                remove_pidfile(&path);
                info!(pid = data.pid, "Stopped MCPO server left by an earlier run");
                Ok(StepResult::succeeded(format!(
                    "Stopped MCPO server left by an earlier run (pid {})",
                    data.pid
                ))
                .with_data(json!({ "pid": data.pid })))
            }
            Ok(data) => {
                debug!(pid = data.pid, "Removing stale PID file");
                remove_pidfile(&path);
                Ok(not_running())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(not_running()),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring unreadable PID file");
                remove_pidfile(&path);
                Ok(not_running())
            }
        }
    }

    async fn probe_health(&self) -> Result<StepResult> {
        let base_url = self.config.base_url();
        let url = health::docs_url(&base_url);
        let status = health::probe_docs(&self.client, &base_url, self.api_key())
            .await
            .with_context(|| format!("GET {url} failed"))?;

        if status.is_success() {
            let mut result = StepResult::with_status(SUCCESS_STATUS);
            result.message = Some(format!("GET {url} returned {status}"));
            Ok(result)
        } else {
            Ok(StepResult::failed(
                "unhealthy",
                format!("GET {url} returned {status}"),
            ))
        }
    }

    async fn collect_tools(&self) -> Result<StepResult> {
        let manifest = read_manifest(&self.config.config_path).await?;
        let base_url = self.config.base_url();

        let mut listed = Map::new();
        let mut failures = Vec::new();
        let mut total = 0;
        for entry in manifest.servers() {
            match tools::fetch_server_tools(&self.client, &base_url, &entry.name, self.api_key())
                .await
            {
                Ok(names) => {
                    debug!(server = %entry.name, tools = names.len(), "Listed tools");
                    total += names.len();
                    listed.insert(entry.name.clone(), json!(names));
                }
                Err(e) => {
                    warn!(server = %entry.name, error = %e, "Tool listing failed");
                    failures.push(format!("{}: {e:#}", entry.name));
                }
            }
        }

        let servers = listed.len();
        let data = Value::Object(listed);
        if failures.is_empty() {
            Ok(StepResult::succeeded(format!(
                "Listed {total} tool(s) from {servers} server(s)"
            ))
            .with_data(data))
        } else {
            Ok(StepResult::failed(
                "partial",
                format!("Could not list tools for {}", failures.join("; ")),
            )
            .with_data(data))
        }
    }
}

#[async_trait]
impl ManagedServer for McpoPlugin {
    fn config(&self) -> &PluginConfig {
        &self.config
    }

    async fn manage_server(&self, action: ServerAction) -> Result<StepResult> {
        match action {
            ServerAction::Start => self.start().await,
            ServerAction::Stop => self.stop().await,
        }
    }

    async fn health_check(&self) -> Result<StepResult> {
        self.probe_health().await
    }

    async fn list_tools(&self) -> Result<StepResult> {
        self.collect_tools().await
    }
}

fn not_running() -> StepResult {
    StepResult::failed("not_running", "MCPO server is not running")
}

fn remove_pidfile(path: &Path) {
    if let Err(e) = pidfile::delete_pidfile(path) {
        warn!(path = %path.display(), error = %e, "Failed to delete PID file");
    }
}

async fn read_manifest(path: &Path) -> Result<ServerManifest> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let document: Value = serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;
    Ok(ServerManifest::from_document(&document))
}
