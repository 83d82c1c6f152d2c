//! Command builder for the probed target.
//!
//! Builds the `tokio::process::Command` from a `ProbeConfig` and spawns it
//! with both output streams piped for capture. The probe launches exactly
//! the argv it is given; there is no path resolution or lookup.

use procprobe_core::ProbeConfig;
use std::process::Stdio;
use tokio::process::{Child, Command};
use tracing::debug;

/// Build and spawn the target process.
///
/// Stdout and stderr are piped for line capture; stdin is closed so a child
/// that reads it cannot stall the run. `kill_on_drop` is set as a last-resort
/// backstop if the probe future is dropped mid-run.
///
/// # Errors
///
/// Returns an error if the process fails to spawn (executable not found,
/// permission denied, etc.). The caller classifies this as a spawn-error
/// outcome; nothing has been started.
pub fn spawn_target(config: &ProbeConfig) -> anyhow::Result<Child> {
    let mut cmd = Command::new(&config.program);
    cmd.args(&config.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    debug!(program = %config.program.display(), args = ?config.args, "spawning probe target");

    let child = cmd
        .spawn()
        .map_err(|e| anyhow::anyhow!("Failed to spawn {}: {}", config.program.display(), e))?;

    Ok(child)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[cfg(unix)]
    use std::os::unix::fs::PermissionsExt;

    #[tokio::test]
    #[cfg(unix)]
    async fn spawns_an_executable_script() {
        let temp_dir = TempDir::new().unwrap();
        let script = temp_dir.path().join("target.sh");
        fs::write(&script, "#!/bin/sh\nexit 0\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        let config = ProbeConfig::new(&script);
        let mut child = spawn_target(&config).expect("spawn should succeed");
        assert!(child.id().is_some());
        let _ = child.wait().await;
    }

    #[tokio::test]
    async fn nonexistent_program_fails_to_spawn() {
        let config = ProbeConfig::new("/nonexistent/path/to/target");
        let result = spawn_target(&config);
        assert!(result.is_err());
        let text = result.unwrap_err().to_string();
        assert!(text.contains("/nonexistent/path/to/target"));
    }
}
