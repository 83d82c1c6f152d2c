//! Probe configuration.
//!
//! This is an intent-based configuration: it expresses what the caller
//! wants observed and for how long, not how the child is driven. It is
//! carried by value and constructed explicitly per invocation; there is no
//! process-global configuration state.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ProbeError;

/// Default wall-clock bound for a probe run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default cadence for liveness/output checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Default wait after a graceful terminate before escalating to a kill.
pub const DEFAULT_GRACE: Duration = Duration::from_secs(2);

/// Default bound on the diagnostic output capture.
pub const DEFAULT_MAX_CAPTURED_LINES: usize = 1000;

/// Configuration for one probe run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Executable to launch.
    pub program: PathBuf,
    /// Ordered argument list passed to the executable.
    pub args: Vec<String>,
    /// Maximum wall-clock duration to wait before the child is stopped.
    pub timeout: Duration,
    /// Cadence of liveness/output checks.
    pub poll_interval: Duration,
    /// Wait after the graceful terminate signal before a forced kill.
    pub grace: Duration,
    /// Literal substrings that signal early success once ALL have appeared
    /// cumulatively across the combined output stream. An empty set disables
    /// marker matching; the probe then resolves only by exit or timeout.
    pub success_markers: Vec<String>,
    /// Bound on the number of output lines kept for diagnostics.
    pub max_captured_lines: usize,
}

impl ProbeConfig {
    /// Create a configuration for `program` with default timing.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            grace: DEFAULT_GRACE,
            success_markers: Vec::new(),
            max_captured_lines: DEFAULT_MAX_CAPTURED_LINES,
        }
    }

    /// Set the argument list.
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Set the wall-clock bound.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the poll cadence.
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Set the grace period before a forced kill.
    #[must_use]
    pub const fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    /// Set the success markers.
    #[must_use]
    pub fn with_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.success_markers = markers.into_iter().map(Into::into).collect();
        self
    }

    /// Set the capture bound.
    #[must_use]
    pub const fn with_max_captured_lines(mut self, max: usize) -> Self {
        self.max_captured_lines = max;
        self
    }

    /// Check the configuration invariants.
    ///
    /// The timeout and poll interval must be positive, the poll interval must
    /// be shorter than the timeout, and the program path must be non-empty.
    pub fn validate(&self) -> Result<(), ProbeError> {
        if self.program.as_os_str().is_empty() {
            return Err(ProbeError::EmptyProgram);
        }
        if self.timeout.is_zero() {
            return Err(ProbeError::ZeroTimeout);
        }
        if self.poll_interval.is_zero() {
            return Err(ProbeError::ZeroPollInterval);
        }
        if self.poll_interval >= self.timeout {
            return Err(ProbeError::PollIntervalExceedsTimeout {
                poll_interval: self.poll_interval,
                timeout: self.timeout,
            });
        }
        Ok(())
    }
}
