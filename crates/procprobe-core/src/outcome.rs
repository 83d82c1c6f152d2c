//! Probe outcomes and the result record returned from every run.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Which child stream a captured line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamSource {
    Stdout,
    Stderr,
}

impl StreamSource {
    /// Stable lowercase name, matching the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }
}

impl fmt::Display for StreamSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of child output read before the probe resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedLine {
    /// Stream the line arrived on.
    pub source: StreamSource,
    /// Line content without the trailing newline.
    pub text: String,
}

impl CapturedLine {
    #[must_use]
    pub fn new(source: StreamSource, text: impl Into<String>) -> Self {
        Self {
            source,
            text: text.into(),
        }
    }
}

/// Classification of one probe run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProbeOutcome {
    /// Every configured success marker appeared before exit or timeout.
    Matched,
    /// The child exited on its own with status 0 before a full marker match.
    ExitedSuccess,
    /// The child exited on its own with a nonzero status (or was killed by
    /// a signal outside the probe's control).
    ExitedFailure,
    /// Neither exit nor a full marker match happened within the timeout.
    TimedOut,
    /// The child could not be started at all.
    SpawnError,
}

impl ProbeOutcome {
    /// Whether this outcome counts as a passing run.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Matched | Self::ExitedSuccess)
    }

    /// Stable name for display and log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Matched => "matched",
            Self::ExitedSuccess => "exited-success",
            Self::ExitedFailure => "exited-failure",
            Self::TimedOut => "timed-out",
            Self::SpawnError => "spawn-error",
        }
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one probe run.
///
/// By the time a result is returned the child is neither running nor zombie:
/// whenever a handle existed it has been terminated and waited on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResult {
    /// How the run resolved.
    pub outcome: ProbeOutcome,
    /// Exit code, present only when the child exited on its own.
    pub exit_code: Option<i32>,
    /// Wall-clock duration from spawn (or spawn attempt) to resolution.
    pub elapsed: Duration,
    /// Ordered bounded capture of output read before resolution.
    pub lines: Vec<CapturedLine>,
    /// Lines evicted from the capture once the bound was reached.
    pub dropped_lines: u64,
    /// PID the child had while it was running, for diagnostics.
    pub pid: Option<u32>,
    /// Human-readable detail (spawn error text, degradation notes).
    pub message: Option<String>,
}

impl ProbeResult {
    /// Result for a child that could not be started.
    #[must_use]
    pub fn spawn_error(message: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            outcome: ProbeOutcome::SpawnError,
            exit_code: None,
            elapsed,
            lines: Vec::new(),
            dropped_lines: 0,
            pid: None,
            message: Some(message.into()),
        }
    }

    /// Whether the run counts as passing.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.outcome.is_success()
    }
}
