//! CLI parser and argument-to-config mapping.

use clap::Parser;
use std::time::Duration;

use procprobe_core::ProbeConfig;

use crate::error::CliError;

/// Command-line interface definition for the probe runner.
#[derive(Parser)]
#[command(name = "procprobe")]
#[command(about = "Launch a command and watch its output for success markers under a hard deadline")]
#[command(version)]
pub struct Cli {
    /// Maximum seconds to wait before the child is stopped
    #[arg(long, default_value_t = 30.0, allow_negative_numbers = true)]
    pub timeout: f64,

    /// Seconds between liveness/output checks
    #[arg(long = "poll-interval", default_value_t = 0.1, allow_negative_numbers = true)]
    pub poll_interval: f64,

    /// Seconds to wait after the terminate signal before a forced kill
    #[arg(long, default_value_t = 2.0, allow_negative_numbers = true)]
    pub grace: f64,

    /// Success marker; repeat for several, all must appear in the output
    #[arg(short = 'm', long = "marker")]
    pub markers: Vec<String>,

    /// Maximum output lines kept for diagnostics
    #[arg(long = "max-lines", default_value_t = 1000)]
    pub max_lines: usize,

    /// Print the full result as JSON instead of a one-line summary
    #[arg(long)]
    pub json: bool,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Command to launch, with its arguments (use `--` before flags meant
    /// for the command)
    #[arg(required = true, trailing_var_arg = true, num_args = 1..)]
    pub command: Vec<String>,
}

impl Cli {
    /// Build the probe configuration these arguments describe.
    pub fn to_config(&self) -> Result<ProbeConfig, CliError> {
        let (program, args) = self
            .command
            .split_first()
            .ok_or_else(|| CliError::Arguments("no command given".to_string()))?;

        Ok(ProbeConfig::new(program)
            .with_args(args.iter().cloned())
            .with_timeout(seconds_flag("--timeout", self.timeout)?)
            .with_poll_interval(seconds_flag("--poll-interval", self.poll_interval)?)
            .with_grace(seconds_flag("--grace", self.grace)?)
            .with_markers(self.markers.iter().cloned())
            .with_max_captured_lines(self.max_lines))
    }
}

fn seconds_flag(flag: &str, secs: f64) -> Result<Duration, CliError> {
    Duration::try_from_secs_f64(secs)
        .map_err(|_| CliError::Arguments(format!("{flag} must be a non-negative number of seconds")))
}
