//! Probe runner trait definition.
//!
//! This port defines the interface for driving one external-process probe.
//! Implementations own every process lifecycle detail internally; callers
//! hand over a configuration and receive a classified result.
//!
//! Configuration is injected per call rather than read from shared mutable
//! state, so a runner can be swapped for a mock in tests of anything built
//! on top of it.

use async_trait::async_trait;

use crate::config::ProbeConfig;
use crate::error::ProbeError;
use crate::outcome::ProbeResult;

/// Runner for bounded external-process probes.
///
/// # Contract
///
/// - `Err` carries ONLY configuration rejection, checked before any child
///   exists.
/// - Once a configuration is accepted, the runner always resolves to a
///   [`ProbeResult`] within `timeout + grace` plus a small fixed margin,
///   whatever the child does.
/// - When the result is returned, no child spawned for the run is still
///   running or left unreaped.
#[async_trait]
pub trait ProbeRunner: Send + Sync {
    /// Run one probe to completion.
    async fn run(&self, config: ProbeConfig) -> Result<ProbeResult, ProbeError>;
}
