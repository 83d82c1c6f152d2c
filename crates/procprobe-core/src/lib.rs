//! Core domain types and port definitions for procprobe.
//!
//! This crate is pure: it owns the probe configuration, the outcome
//! taxonomy, marker matching, bounded output capture, and the port traits
//! that adapters implement. It contains no process or I/O code: spawning
//! and terminating children is the runtime crate's concern.

#![deny(unsafe_code)]

pub mod capture;
pub mod config;
pub mod error;
pub mod markers;
pub mod outcome;
pub mod ports;

// Re-export commonly used types for convenience
pub use capture::CaptureBuffer;
pub use config::{
    DEFAULT_GRACE, DEFAULT_MAX_CAPTURED_LINES, DEFAULT_POLL_INTERVAL, DEFAULT_TIMEOUT, ProbeConfig,
};
pub use error::ProbeError;
pub use markers::MarkerTracker;
pub use outcome::{CapturedLine, ProbeOutcome, ProbeResult, StreamSource};
pub use ports::{NoopProbeSink, ProbeLogSinkPort, ProbeRunner};
