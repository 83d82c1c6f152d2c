//! End-to-end probe scenarios against throwaway shell scripts.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tempfile::TempDir;

use procprobe_core::{ProbeConfig, ProbeOutcome, ProbeRunner, StreamSource};
use procprobe_runtime::ProcessProbe;

fn write_script(dir: &TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn pid_alive(pid: u32) -> bool {
    Path::new(&format!("/proc/{pid}")).exists()
}

fn fast_config(program: impl Into<PathBuf>) -> ProbeConfig {
    ProbeConfig::new(program)
        .with_timeout(Duration::from_secs(10))
        .with_poll_interval(Duration::from_millis(25))
        .with_grace(Duration::from_millis(500))
}

#[tokio::test]
async fn silent_hanging_child_times_out_within_bound() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "hang.sh", "sleep 100");

    let timeout = Duration::from_secs(1);
    let grace = Duration::from_millis(500);
    let config = ProbeConfig::new(script)
        .with_timeout(timeout)
        .with_poll_interval(Duration::from_millis(50))
        .with_grace(grace);

    let started = Instant::now();
    let result = ProcessProbe::new().run(config).await.unwrap();
    let wall = started.elapsed();

    assert_eq!(result.outcome, ProbeOutcome::TimedOut);
    assert!(result.exit_code.is_none());
    assert!(wall >= timeout);
    assert!(wall < Duration::from_secs(4), "took {wall:?}");
    assert!(!pid_alive(result.pid.unwrap()));
}

#[tokio::test]
async fn marker_match_resolves_early_and_stops_child() {
    let dir = TempDir::new().unwrap();
    let script = write_script(
        &dir,
        "server.sh",
        "echo 'Setting up multi-GPU mode'\necho 'Successfully verified access'\nsleep 30",
    );

    let config = ProbeConfig::new(script)
        .with_timeout(Duration::from_secs(30))
        .with_poll_interval(Duration::from_millis(25))
        .with_grace(Duration::from_millis(500))
        .with_markers(["Setting up multi-GPU mode", "Successfully verified access"]);

    let started = Instant::now();
    let result = ProcessProbe::new().run(config).await.unwrap();
    let wall = started.elapsed();

    assert_eq!(result.outcome, ProbeOutcome::Matched);
    assert!(result.is_success());
    assert!(wall < Duration::from_secs(5), "took {wall:?}");
    assert!(
        result
            .lines
            .iter()
            .any(|l| l.text.contains("Setting up multi-GPU mode"))
    );
    assert!(
        result
            .lines
            .iter()
            .any(|l| l.text.contains("Successfully verified access"))
    );
    assert!(!pid_alive(result.pid.unwrap()));
}

#[tokio::test]
async fn nonexistent_program_is_a_spawn_error() {
    let config = fast_config("/nonexistent/path/to/a/binary");

    let started = Instant::now();
    let result = ProcessProbe::new().run(config).await.unwrap();

    assert_eq!(result.outcome, ProbeOutcome::SpawnError);
    assert!(started.elapsed() < Duration::from_secs(1));
    assert!(result.pid.is_none());
    assert!(result.exit_code.is_none());
    assert!(
        result
            .message
            .as_deref()
            .unwrap()
            .contains("/nonexistent/path/to/a/binary")
    );
}

#[tokio::test]
async fn clean_exit_before_match_is_exited_success() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "ok.sh", "echo 'only partial output'\nexit 0");

    let config = fast_config(script).with_markers(["never printed"]);
    let result = ProcessProbe::new().run(config).await.unwrap();

    assert_eq!(result.outcome, ProbeOutcome::ExitedSuccess);
    assert_eq!(result.exit_code, Some(0));
    assert!(result.lines.iter().any(|l| l.text == "only partial output"));
}

#[tokio::test]
async fn nonzero_exit_records_the_code() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "fail.sh", "echo 'about to fail' 1>&2\nexit 3");

    let config = fast_config(script);
    let result = ProcessProbe::new().run(config).await.unwrap();

    assert_eq!(result.outcome, ProbeOutcome::ExitedFailure);
    assert_eq!(result.exit_code, Some(3));
    assert!(!result.is_success());
    assert!(
        result
            .lines
            .iter()
            .any(|l| l.source == StreamSource::Stderr && l.text == "about to fail")
    );
}

#[tokio::test]
async fn markers_match_across_streams_and_lines() {
    let dir = TempDir::new().unwrap();
    let script = write_script(
        &dir,
        "split.sh",
        "echo 'phase one done'\necho 'phase two done' 1>&2\nsleep 30",
    );

    let config = fast_config(script).with_markers(["phase one", "phase two"]);
    let result = ProcessProbe::new().run(config).await.unwrap();

    assert_eq!(result.outcome, ProbeOutcome::Matched);
    assert!(
        result
            .lines
            .iter()
            .any(|l| l.source == StreamSource::Stderr && l.text.contains("phase two"))
    );
}

#[tokio::test]
async fn empty_marker_set_never_matches_vacuously() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "chatty.sh", "echo noise\nsleep 0.3\nexit 0");

    let config = fast_config(script);
    let result = ProcessProbe::new().run(config).await.unwrap();

    // Without markers the probe waits for the exit, it does not match.
    assert_eq!(result.outcome, ProbeOutcome::ExitedSuccess);
    assert!(result.elapsed >= Duration::from_millis(300));
}

#[tokio::test]
async fn capture_is_bounded_and_counts_evictions() {
    let dir = TempDir::new().unwrap();
    let script = write_script(
        &dir,
        "spam.sh",
        "i=0\nwhile [ $i -lt 50 ]; do echo \"line $i\"; i=$((i+1)); done\nexit 0",
    );

    let config = fast_config(script).with_max_captured_lines(10);
    let result = ProcessProbe::new().run(config).await.unwrap();

    assert_eq!(result.outcome, ProbeOutcome::ExitedSuccess);
    assert_eq!(result.lines.len(), 10);
    assert_eq!(result.dropped_lines, 40);
    // The ring keeps the most recent lines.
    assert_eq!(result.lines.last().unwrap().text, "line 49");
}

#[tokio::test]
async fn sigterm_resistant_child_is_still_stopped() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "stubborn.sh", "trap '' TERM\necho started\nsleep 100");

    let grace = Duration::from_millis(300);
    let config = ProbeConfig::new(script)
        .with_timeout(Duration::from_secs(10))
        .with_poll_interval(Duration::from_millis(25))
        .with_grace(grace)
        .with_markers(["started"]);

    let started = Instant::now();
    let result = ProcessProbe::new().run(config).await.unwrap();
    let wall = started.elapsed();

    assert_eq!(result.outcome, ProbeOutcome::Matched);
    assert!(wall >= grace);
    assert!(wall < Duration::from_secs(6), "took {wall:?}");
    assert!(!pid_alive(result.pid.unwrap()));
}

#[tokio::test]
async fn signal_killed_child_is_failure_without_exit_code() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "suicide.sh", "kill -9 $$");

    let config = fast_config(script);
    let result = ProcessProbe::new().run(config).await.unwrap();

    assert_eq!(result.outcome, ProbeOutcome::ExitedFailure);
    assert!(result.exit_code.is_none());
    assert!(result.message.as_deref().unwrap().contains("signal"));
}
