//! The probe engine: bounded polling over one child process.
//!
//! One `ProcessProbe` drives one child per run. The loop checks for exit,
//! drains newly available output, tests the marker set, and sleeps, until
//! the child resolves the run or the deadline does. Whenever a live child
//! handle exists on a resolution path, it is terminated and reaped before
//! the result is returned, so `run()` never leaks a process and never
//! blocks past `timeout + grace` plus a small fixed margin.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Child;
use tokio::sync::mpsc::{self, error::TryRecvError};
use tokio::time::{Instant, sleep, timeout};
use tracing::{debug, info, warn};

use procprobe_core::{
    CaptureBuffer, CapturedLine, MarkerTracker, ProbeConfig, ProbeError, ProbeLogSinkPort,
    ProbeOutcome, ProbeResult, ProbeRunner,
};

use crate::command::spawn_target;
use crate::shutdown::shutdown_child;
use crate::stream::spawn_line_readers;

/// Upper bound on draining buffered output after the child has exited.
/// Readers close at EOF almost immediately; the window only matters when a
/// grandchild inherited the pipes and keeps them open.
const OUTPUT_DRAIN_WINDOW: Duration = Duration::from_millis(500);

/// Production [`ProbeRunner`]: spawns the configured command and classifies
/// the run within the configured wall-clock bound.
#[derive(Default)]
pub struct ProcessProbe {
    sink: Option<Arc<dyn ProbeLogSinkPort>>,
}

impl ProcessProbe {
    /// Create a probe that only echoes child output to `tracing`.
    #[must_use]
    pub fn new() -> Self {
        Self { sink: None }
    }

    /// Create a probe that also mirrors every output line into `sink`.
    #[must_use]
    pub fn with_sink(sink: Arc<dyn ProbeLogSinkPort>) -> Self {
        Self { sink: Some(sink) }
    }
}

#[async_trait]
impl ProbeRunner for ProcessProbe {
    async fn run(&self, config: ProbeConfig) -> Result<ProbeResult, ProbeError> {
        config.validate()?;

        info!(
            program = %config.program.display(),
            timeout = ?config.timeout,
            markers = config.success_markers.len(),
            "starting probe"
        );

        let started = Instant::now();
        let mut child = match spawn_target(&config) {
            Ok(child) => child,
            Err(e) => {
                warn!(error = %e, "probe target failed to spawn");
                return Ok(ProbeResult::spawn_error(e.to_string(), started.elapsed()));
            }
        };
        let pid = child.id();

        let mut lines = spawn_line_readers(&mut child, self.sink.clone());
        let mut tracker = MarkerTracker::new(config.success_markers.clone());
        let mut capture = CaptureBuffer::new(config.max_captured_lines);

        let mut exit_code = None;
        let mut message = None;
        let outcome;

        loop {
            // 1. Child exited on its own: drain what it left behind and
            //    classify by exit status.
            match child.try_wait() {
                Ok(Some(status)) => {
                    drain_remaining(&mut lines, &mut tracker, &mut capture).await;
                    exit_code = status.code();
                    if status.success() {
                        outcome = ProbeOutcome::ExitedSuccess;
                    } else {
                        outcome = ProbeOutcome::ExitedFailure;
                        if exit_code.is_none() {
                            message = Some("child was killed by a signal".to_string());
                        }
                    }
                    break;
                }
                Ok(None) => {}
                Err(e) => {
                    // The handle is no longer observable; stop the child and
                    // resolve rather than propagate.
                    warn!(error = %e, "liveness check failed; stopping child");
                    message = Some(format!("liveness check failed: {e}"));
                    terminate(&mut child, config.grace).await;
                    outcome = ProbeOutcome::TimedOut;
                    break;
                }
            }

            // 2. Drain newly available output without blocking.
            drain_available(&mut lines, &mut tracker, &mut capture);

            // 3. Full marker match resolves early.
            if tracker.is_complete() {
                debug!("all success markers observed");
                terminate(&mut child, config.grace).await;
                outcome = ProbeOutcome::Matched;
                break;
            }

            // 4. Bounded sleep, then the deadline check.
            sleep(config.poll_interval).await;
            if started.elapsed() >= config.timeout {
                warn!(elapsed = ?started.elapsed(), "timeout reached; stopping child");
                terminate(&mut child, config.grace).await;
                outcome = ProbeOutcome::TimedOut;
                break;
            }
        }

        let elapsed = started.elapsed();
        info!(outcome = %outcome, ?elapsed, "probe resolved");

        let dropped_lines = capture.dropped();
        Ok(ProbeResult {
            outcome,
            exit_code,
            elapsed,
            lines: capture.into_lines(),
            dropped_lines,
            pid,
            message,
        })
    }
}

/// Pull every line already sitting in the channel.
fn drain_available(
    lines: &mut mpsc::Receiver<CapturedLine>,
    tracker: &mut MarkerTracker,
    capture: &mut CaptureBuffer,
) {
    loop {
        match lines.try_recv() {
            Ok(line) => {
                tracker.observe(&line.text);
                capture.push(line);
            }
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
        }
    }
}

/// Drain output left behind by an exited child, bounded by the drain window.
async fn drain_remaining(
    lines: &mut mpsc::Receiver<CapturedLine>,
    tracker: &mut MarkerTracker,
    capture: &mut CaptureBuffer,
) {
    let deadline = Instant::now() + OUTPUT_DRAIN_WINDOW;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }
        match timeout(remaining, lines.recv()).await {
            Ok(Some(line)) => {
                tracker.observe(&line.text);
                capture.push(line);
            }
            // Readers hit EOF (None) or the window elapsed - either way stop.
            Ok(None) | Err(_) => break,
        }
    }
}

/// Stop the child without ever propagating: termination failures are logged
/// and absorbed so the bounded-return contract holds.
async fn terminate(child: &mut Child, grace: Duration) {
    match shutdown_child(child, grace).await {
        Ok(status) => debug!(?status, "child stopped"),
        Err(e) => warn!(error = %e, "termination degraded; continuing"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn invalid_config_is_rejected_before_spawn() {
        let probe = ProcessProbe::new();
        let config = ProbeConfig::new("/bin/true").with_timeout(Duration::ZERO);
        assert!(probe.run(config).await.is_err());
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn quick_clean_exit_classifies_as_success() {
        let probe = ProcessProbe::new();
        let config = ProbeConfig::new("echo")
            .with_args(["hello"])
            .with_timeout(Duration::from_secs(5))
            .with_poll_interval(Duration::from_millis(20));

        let result = probe.run(config).await.unwrap();
        assert_eq!(result.outcome, ProbeOutcome::ExitedSuccess);
        assert_eq!(result.exit_code, Some(0));
        assert!(result.lines.iter().any(|l| l.text == "hello"));
    }
}
