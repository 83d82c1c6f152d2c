//! Graceful shutdown for `tokio::process::Child` with SIGTERM → SIGKILL escalation.

use std::io;
use std::process::ExitStatus;
use std::time::Duration;

use tokio::process::Child;
use tokio::time::timeout;
use tracing::debug;

#[cfg(unix)]
use nix::sys::signal::{self, Signal};
#[cfg(unix)]
use nix::unistd::Pid;

/// Fixed upper bound on waiting for reaping after the forced kill. Keeps the
/// whole shutdown sequence bounded even against an unkillable child.
const KILL_REAP_MARGIN: Duration = Duration::from_secs(2);

/// Gracefully shut down a child process, escalating to a forced kill.
///
/// # Strategy
/// 1. Send SIGTERM and wait up to `grace` for a voluntary exit
/// 2. If still running, send SIGKILL
/// 3. Wait for process reaping, bounded by a small fixed margin
///
/// # Platform behavior
/// - Unix: SIGTERM via the nix crate, then SIGKILL via `.kill()`
/// - Windows: immediately calls `.kill()` (no graceful shutdown available)
///
/// # Returns
/// - `Ok(ExitStatus)` once the process has been reaped
/// - `Err` if process operations fail or the child survived the kill past
///   the margin; the child is still not owned by anyone after this returns
pub async fn shutdown_child(child: &mut Child, grace: Duration) -> io::Result<ExitStatus> {
    #[cfg(unix)]
    {
        shutdown_unix(child, grace).await
    }

    #[cfg(not(unix))]
    {
        let _ = grace;
        force_kill(child).await
    }
}

#[cfg(unix)]
async fn shutdown_unix(child: &mut Child, grace: Duration) -> io::Result<ExitStatus> {
    let Some(pid) = child.id() else {
        // Already exited; wait() returns the cached status without blocking.
        return child.wait().await;
    };

    // Phase 1: SIGTERM with the configured grace period
    if let Err(e) = signal::kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
        // Process may have already exited
        if e == nix::errno::Errno::ESRCH {
            return child.wait().await;
        }
        debug!(error = %e, "SIGTERM failed; escalating to forced kill");
    } else if let Ok(result) = timeout(grace, child.wait()).await {
        return result;
    }

    // Phase 2: SIGKILL, with reaping bounded by the fixed margin
    force_kill(child).await
}

async fn force_kill(child: &mut Child) -> io::Result<ExitStatus> {
    let reap = async {
        if let Err(e) = child.kill().await {
            // Typically means the child exited between the signal and here.
            debug!(error = %e, "forced kill reported an error");
        }
        child.wait().await
    };

    match timeout(KILL_REAP_MARGIN, reap).await {
        Ok(result) => result,
        Err(_) => Err(io::Error::new(
            io::ErrorKind::TimedOut,
            "child survived the forced kill past the reap margin",
        )),
    }
}
