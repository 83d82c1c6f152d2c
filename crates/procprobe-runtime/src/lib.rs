//! Process runtime and OS-level concerns for procprobe.
//!
//! This crate owns everything the core domain abstracts away: spawning the
//! target command with piped stdio, reading its output as line streams,
//! terminating it gracefully, and driving the bounded polling loop that
//! classifies a run into a [`procprobe_core::ProbeResult`].

#![deny(unsafe_code)]

mod command;
mod probe;
mod shutdown;
mod stream;

// Re-export the main ProbeRunner implementation
pub use probe::ProcessProbe;

// Re-export graceful shutdown for direct use if needed
pub use shutdown::shutdown_child;
