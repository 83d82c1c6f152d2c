//! CLI-specific error types and exit-code mappings.

use procprobe_core::ProbeError;
use thiserror::Error;

/// CLI-specific error type.
///
/// Probe outcomes are not errors; they map to the process exit status in
/// `main`. This type only covers failures to get a probe running or to
/// report its result.
#[derive(Debug, Error)]
pub enum CliError {
    /// Argument or configuration error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// Failure while reporting the result.
    #[error("{0}")]
    Report(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 0: Success (a passing probe outcome)
    /// - 1: General error (a failing probe outcome, or reporting failure)
    /// - 2: Misuse of shell command (invalid arguments), EX_USAGE
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Arguments(_) => 2,
            Self::Report(_) => 1,
        }
    }
}

impl From<ProbeError> for CliError {
    fn from(err: ProbeError) -> Self {
        Self::Arguments(err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Report(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_errors_exit_2() {
        assert_eq!(CliError::Arguments("bad".into()).exit_code(), 2);
        assert_eq!(CliError::Report("oops".into()).exit_code(), 1);
    }

    #[test]
    fn probe_errors_are_usage_errors() {
        let err: CliError = ProbeError::ZeroTimeout.into();
        assert_eq!(err.exit_code(), 2);
    }
}
