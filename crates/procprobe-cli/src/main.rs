//! CLI entry point - the composition root.
//!
//! Wires the production probe engine to the parsed arguments, runs one
//! probe, reports the result, and maps it to the process exit status:
//! passing outcomes exit 0, failing outcomes exit 1, usage errors exit 2.

use clap::Parser;
use std::process::ExitCode;
use tracing::debug;

use procprobe_cli::{Cli, CliError};
use procprobe_core::{ProbeResult, ProbeRunner};
use procprobe_runtime::ProcessProbe;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(passed) => {
            if passed {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
        }
    }
}

async fn run(cli: Cli) -> Result<bool, CliError> {
    let config = cli.to_config()?;
    debug!(program = %config.program.display(), "probe configured");

    let probe = ProcessProbe::new();
    let result = probe.run(config).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_summary(&result);
    }

    Ok(result.is_success())
}

fn print_summary(result: &ProbeResult) {
    let mut summary = format!(
        "{} after {:.2}s",
        result.outcome,
        result.elapsed.as_secs_f64()
    );
    if let Some(code) = result.exit_code {
        summary.push_str(&format!(" (exit code {code})"));
    }
    if let Some(ref message) = result.message {
        summary.push_str(&format!(": {message}"));
    }
    if result.dropped_lines > 0 {
        summary.push_str(&format!(" [{} output lines dropped]", result.dropped_lines));
    }
    println!("{summary}");
}

/// Initialize logging on stderr so stdout stays clean for `--json`.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default_directive = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_directive)),
        )
        .with_writer(std::io::stderr)
        .init();
}
