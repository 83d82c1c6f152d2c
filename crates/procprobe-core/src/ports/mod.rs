//! Port definitions (trait abstractions) for adapters.
//!
//! Ports define the interfaces the core domain expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No process/filesystem implementation details in any signature
//! - Intent-based methods for the probe runner (not implementation-leaking)

pub mod log_sink;
pub mod probe_runner;

pub use log_sink::{NoopProbeSink, ProbeLogSinkPort};
pub use probe_runner::ProbeRunner;
