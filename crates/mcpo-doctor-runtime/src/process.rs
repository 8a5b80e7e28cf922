//! Gateway process control.
//!
//! Two shutdown paths:
//! - [`shutdown_child`] for a gateway this process spawned (reaps it)
//! - [`kill_pid`] for a gateway recorded in a PID file by an earlier run

use std::io;
use std::process::ExitStatus;
use std::time::Duration;

use tokio::process::Child;
use tracing::debug;

#[cfg(unix)]
use nix::errno::Errno;
#[cfg(unix)]
use nix::sys::signal::{self, Signal};
#[cfg(unix)]
use nix::unistd::Pid;
#[cfg(unix)]
use tokio::time::{Instant, sleep, timeout};

/// Time a gateway gets to exit after SIGTERM before it is killed.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(5);

#[cfg(unix)]
const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Stop an owned child with SIGTERM, then SIGKILL once `grace` has elapsed.
///
/// Always waits for the child so no zombie is left behind. On non-Unix
/// platforms the child is killed immediately.
pub async fn shutdown_child(mut child: Child, grace: Duration) -> io::Result<ExitStatus> {
    // No PID means the child was already reaped
    let Some(pid) = child.id() else {
        return child.wait().await;
    };

    #[cfg(unix)]
    {
        match send_signal(pid, Some(Signal::SIGTERM)) {
            Ok(()) => {}
            Err(Errno::ESRCH) => return child.wait().await,
            Err(e) => return Err(io::Error::other(e)),
        }

        if let Ok(status) = timeout(grace, child.wait()).await {
            return status;
        }
    }

    debug!(pid, ?grace, "Killing gateway");

    #[cfg(not(unix))]
    let _ = grace;

    child.kill().await?;
    child.wait().await
}

/// Stop a process known only by PID: SIGTERM, then SIGKILL once `grace`
/// has elapsed.
///
/// The process cannot be reaped from here. Returns `Ok` once it is gone or
/// if it was already gone.
#[cfg(unix)]
pub async fn kill_pid(pid: u32, grace: Duration) -> io::Result<()> {
    match send_signal(pid, Some(Signal::SIGTERM)) {
        Ok(()) => {}
        Err(Errno::ESRCH) => return Ok(()),
        Err(e) => return Err(io::Error::other(e)),
    }
    if wait_for_exit(pid, grace).await {
        return Ok(());
    }

    debug!(pid, ?grace, "Grace period elapsed, sending SIGKILL");
    match send_signal(pid, Some(Signal::SIGKILL)) {
        Ok(()) => {}
        Err(Errno::ESRCH) => return Ok(()),
        Err(e) => return Err(io::Error::other(e)),
    }
    if wait_for_exit(pid, Duration::from_secs(2)).await {
        return Ok(());
    }

    Err(io::Error::new(
        io::ErrorKind::TimedOut,
        format!("process {pid} did not exit after SIGKILL"),
    ))
}

#[cfg(not(unix))]
pub async fn kill_pid(_pid: u32, _grace: Duration) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "stopping a gateway by PID is only supported on Unix",
    ))
}

/// Whether a process with this PID exists.
#[cfg(unix)]
pub fn pid_exists(pid: u32) -> bool {
    match send_signal(pid, None) {
        Ok(()) => true,
        Err(Errno::ESRCH) => false,
        // EPERM: exists, owned by someone else
        Err(_) => true,
    }
}

#[cfg(not(unix))]
pub fn pid_exists(_pid: u32) -> bool {
    false
}

/// Whether a live PID looks like a gateway started through `launcher`.
///
/// On Linux the command line is checked for an argument whose file name
/// matches the launcher's (`mcpo`, or a custom launcher script), so a PID
/// reused by an unrelated process is left alone. Elsewhere only liveness
/// is checked.
pub fn is_launcher_process(pid: u32, launcher: &str) -> bool {
    #[cfg(target_os = "linux")]
    {
        let Some(expected) = std::path::Path::new(launcher).file_name() else {
            return false;
        };
        std::fs::read(format!("/proc/{pid}/cmdline")).is_ok_and(|cmdline| {
            cmdline
                .split(|byte| *byte == 0)
                .filter_map(|arg| std::str::from_utf8(arg).ok())
                .any(|arg| std::path::Path::new(arg).file_name() == Some(expected))
        })
    }

    #[cfg(not(target_os = "linux"))]
    {
        let _ = launcher;
        pid_exists(pid)
    }
}

#[cfg(unix)]
fn send_signal(pid: u32, sig: Option<Signal>) -> Result<(), Errno> {
    let raw = i32::try_from(pid).map_err(|_| Errno::ESRCH)?;
    signal::kill(Pid::from_raw(raw), sig)
}

/// Poll until `pid` is gone or `limit` has elapsed.
#[cfg(unix)]
async fn wait_for_exit(pid: u32, limit: Duration) -> bool {
    let deadline = Instant::now() + limit;
    while Instant::now() < deadline {
        sleep(EXIT_POLL_INTERVAL).await;
        if !pid_exists(pid) {
            return true;
        }
    }
    false
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tokio::process::Command;

    #[test]
    fn pid_exists_for_self() {
        assert!(pid_exists(std::process::id()));
    }

    #[test]
    fn pid_exists_false_for_impossible_pid() {
        assert!(!pid_exists(999_999));
        assert!(!pid_exists(u32::MAX));
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn launcher_match_uses_argument_file_name() {
        assert!(!is_launcher_process(std::process::id(), "mcpo"));

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("custom-gateway");
        std::fs::write(&script, "#!/bin/sh\nwhile true; do sleep 1; done\n").unwrap();
        let mut child = Command::new("sh").arg(&script).spawn().unwrap();
        let pid = child.id().unwrap();
        // Until exec completes the cmdline is still this test binary's
        sleep(Duration::from_millis(300)).await;

        assert!(is_launcher_process(pid, "/opt/bin/custom-gateway"));
        assert!(is_launcher_process(pid, "custom-gateway"));
        assert!(!is_launcher_process(pid, "mcpo"));

        child.kill().await.unwrap();
    }

    /// Child that ignores SIGTERM, so only SIGKILL can stop it.
    async fn spawn_term_ignoring_child() -> tokio::process::Child {
        let child = Command::new("sh")
            .args(["-c", "trap '' TERM; while true; do sleep 1; done"])
            .spawn()
            .unwrap();
        // Let the shell install the trap before it is signalled
        sleep(Duration::from_millis(300)).await;
        child
    }

    #[tokio::test]
    async fn shutdown_child_terminates_with_sigterm() {
        let child = Command::new("sleep").arg("30").spawn().unwrap();

        let status = shutdown_child(child, DEFAULT_GRACE_PERIOD).await.unwrap();
        assert!(!status.success());
    }

    #[tokio::test]
    async fn shutdown_child_handles_already_exited() {
        let child = Command::new("true").spawn().unwrap();
        sleep(Duration::from_millis(100)).await;

        assert!(shutdown_child(child, DEFAULT_GRACE_PERIOD).await.is_ok());
    }

    #[tokio::test]
    async fn shutdown_child_escalates_to_sigkill() {
        use std::os::unix::process::ExitStatusExt;

        let child = spawn_term_ignoring_child().await;
        let started = Instant::now();

        let status = shutdown_child(child, Duration::from_millis(300))
            .await
            .unwrap();

        assert_eq!(status.signal(), Some(Signal::SIGKILL as i32));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn kill_pid_escalates_to_sigkill() {
        let mut child = spawn_term_ignoring_child().await;
        let pid = child.id().unwrap();

        let reaper = tokio::spawn(async move { child.wait().await });
        kill_pid(pid, Duration::from_millis(300)).await.unwrap();
        let status = reaper.await.unwrap().unwrap();

        assert!(!status.success());
        assert!(!pid_exists(pid));
    }

    #[tokio::test]
    async fn kill_pid_handles_already_gone() {
        assert!(kill_pid(999_999, Duration::from_millis(200)).await.is_ok());
    }

    #[tokio::test]
    async fn kill_pid_terminates_unowned_process() {
        let mut child = Command::new("sleep").arg("60").spawn().unwrap();
        let pid = child.id().unwrap();

        // Reap concurrently so the exited process does not linger as a zombie.
        let reaper = tokio::spawn(async move { child.wait().await });
        kill_pid(pid, Duration::from_secs(2)).await.unwrap();
        reaper.await.unwrap().unwrap();

        assert!(!pid_exists(pid));
    }
}
