//! Async line readers for the child's output streams (non-UTF8-safe).
//!
//! Probed programs can emit non-UTF8 bytes on stdout/stderr. Using
//! `BufReader::lines()` would terminate the reader task on invalid UTF-8, so
//! lines are read at the byte level and decoded lossily. Each line is echoed
//! to `tracing`, mirrored into an optional sink, and forwarded over a bounded
//! channel to the polling loop.

use procprobe_core::{CapturedLine, ProbeLogSinkPort, StreamSource};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tokio::sync::mpsc;
use tracing::debug;

/// Capacity of the line channel between the readers and the polling loop.
/// A chatty child backpressures into its pipe once this fills between polls.
const LINE_CHANNEL_CAPACITY: usize = 1024;

/// Take the child's stdout/stderr and spawn one reader task per stream.
///
/// The returned receiver yields lines from both streams in arrival order and
/// closes once both streams hit EOF (or the tasks stop because the receiver
/// was dropped).
pub fn spawn_line_readers(
    child: &mut Child,
    sink: Option<Arc<dyn ProbeLogSinkPort>>,
) -> mpsc::Receiver<CapturedLine> {
    let (tx, rx) = mpsc::channel(LINE_CHANNEL_CAPACITY);

    if let Some(stdout) = child.stdout.take() {
        spawn_reader(stdout, StreamSource::Stdout, tx.clone(), sink.clone());
    }
    if let Some(stderr) = child.stderr.take() {
        spawn_reader(stderr, StreamSource::Stderr, tx, sink);
    }

    rx
}

fn spawn_reader(
    stream: impl AsyncRead + Unpin + Send + 'static,
    source: StreamSource,
    tx: mpsc::Sender<CapturedLine>,
    sink: Option<Arc<dyn ProbeLogSinkPort>>,
) {
    tokio::spawn(async move {
        let mut reader = BufReader::new(stream);
        let mut buf: Vec<u8> = Vec::with_capacity(1024);

        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break, // EOF
                Ok(_) => {
                    // Trim trailing newline(s)
                    if buf.last() == Some(&b'\n') {
                        buf.pop();
                        if buf.last() == Some(&b'\r') {
                            buf.pop();
                        }
                    }

                    let line = String::from_utf8_lossy(&buf).to_string();
                    debug!(%source, "{}: {}", source, line);
                    if let Some(ref s) = sink {
                        s.append(source, &line);
                    }
                    if tx.send(CapturedLine::new(source, line)).await.is_err() {
                        // Receiver gone - the probe already resolved.
                        break;
                    }
                }
                Err(e) => {
                    debug!(%source, error = %e, "line reader exiting due to read error");
                    break;
                }
            }
        }

        debug!(%source, "line reader task exiting");
    });
}
