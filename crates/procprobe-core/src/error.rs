//! Probe error taxonomy.
//!
//! The only fallible surface outside a [`ProbeResult`](crate::ProbeResult)
//! is configuration rejection. Everything that happens to the child after a
//! valid configuration is accepted (spawn failure, crash, hang, unreadable
//! output) is classified into an outcome, never raised as an error.

use std::time::Duration;
use thiserror::Error;

/// Errors that reject a probe configuration before any child is spawned.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The program path is empty.
    #[error("Program path must not be empty")]
    EmptyProgram,

    /// The wall-clock bound is zero.
    #[error("Timeout must be greater than zero")]
    ZeroTimeout,

    /// The poll cadence is zero.
    #[error("Poll interval must be greater than zero")]
    ZeroPollInterval,

    /// The poll cadence does not fit inside the wall-clock bound.
    #[error("Poll interval {poll_interval:?} must be shorter than timeout {timeout:?}")]
    PollIntervalExceedsTimeout {
        poll_interval: Duration,
        timeout: Duration,
    },
}
