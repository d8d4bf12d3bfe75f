//! Live tail of the log store.
//!
//! A [`TailStreamer`] is opened positioned at end-of-file, then polls for
//! new bytes and forwards each read to a [`TailSink`] as one frame. Between
//! reads it checks its [`TruncationListener`]; on a notification it reopens
//! the file and jumps to the new end-of-file. Bytes written between the
//! truncation and the reopen may be skipped, never replayed.
//!
//! ```text
//! Opening --> Streaming <--> Resetting
//!                 |
//!                 v
//!              Closed
//! ```

use std::future::Future;
use std::time::Duration;

use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tokio_util::sync::CancellationToken;

use crate::error::CoreError;
use crate::log_store::LogStore;
use crate::truncation::TruncationListener;

/// Default pause between polls once end-of-file is reached.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Default maximum number of bytes per read (and therefore per frame).
pub const DEFAULT_READ_BUFFER_BYTES: usize = 1024;

/// The subscriber side of the stream went away or failed.
#[derive(Debug, thiserror::Error)]
#[error("subscriber transport error: {0}")]
pub struct TransportError(pub String);

/// Destination for forwarded log bytes (e.g. a WebSocket connection).
pub trait TailSink: Send {
    /// Forward one chunk, exactly as read.
    fn forward(&mut self, chunk: &[u8]) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Close the transport, optionally with a reason. Errors are ignored.
    fn close(&mut self, reason: Option<String>) -> impl Future<Output = ()> + Send;
}

#[derive(Debug, Clone, Copy)]
pub struct TailConfig {
    pub poll_interval: Duration,
    pub read_buffer_bytes: usize,
}

/// Why a streamer reached `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailOutcome {
    /// The cancellation token fired (client hung up or server shutdown).
    Cancelled,
    /// Forwarding a chunk failed.
    SubscriberGone,
    /// Reopening the log after a truncation failed.
    ReopenFailed,
    /// A read failed with something other than end-of-file.
    ReadFailed,
}

/// Per-subscriber tail loop. Owns the read handle and cursor.
pub struct TailStreamer {
    store: LogStore,
    config: TailConfig,
    file: File,
    cursor: u64,
}

impl TailStreamer {
    /// `Opening`: open the log and position the cursor at end-of-file.
    ///
    /// Nothing written before this returns is ever forwarded.
    pub async fn open(store: LogStore, config: TailConfig) -> Result<Self, CoreError> {
        let (file, cursor) = store.open_at_end().await?;
        tracing::debug!(path = %store.path().display(), cursor, "Tail opened at end of log");
        Ok(Self {
            store,
            config,
            file,
            cursor,
        })
    }

    /// Current read position in the log file.
    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    /// Run `Streaming` until the sink fails, a read fails, or `cancel` fires.
    ///
    /// Read errors and reopen failures are reported to the sink once as a
    /// close reason. A failed forward ends the loop without retrying.
    pub async fn run<S: TailSink>(
        mut self,
        mut sink: S,
        mut truncations: TruncationListener,
        cancel: CancellationToken,
    ) -> TailOutcome {
        let mut buf = vec![0u8; self.config.read_buffer_bytes.max(1)];

        loop {
            if cancel.is_cancelled() {
                sink.close(None).await;
                return TailOutcome::Cancelled;
            }

            if truncations.try_recv() {
                if let Err(e) = self.reset().await {
                    tracing::error!(error = %e, "Failed to reopen log file after truncation");
                    sink.close(Some(e.to_string())).await;
                    return TailOutcome::ReopenFailed;
                }
                continue;
            }

            match self.file.read(&mut buf).await {
                Ok(0) => {
                    tokio::select! {
                        _ = cancel.cancelled() => {
                            sink.close(None).await;
                            return TailOutcome::Cancelled;
                        }
                        _ = tokio::time::sleep(self.config.poll_interval) => {}
                    }
                }
                Ok(n) => {
                    if let Err(e) = sink.forward(&buf[..n]).await {
                        tracing::debug!(error = %e, "Tail subscriber gone");
                        return TailOutcome::SubscriberGone;
                    }
                    self.cursor += n as u64;
                }
                Err(e) => {
                    tracing::error!(error = %e, cursor = self.cursor, "Error reading log file");
                    sink.close(Some(format!("Error reading log file: {e}"))).await;
                    return TailOutcome::ReadFailed;
                }
            }
        }
    }

    /// `Resetting`: drop the handle, reopen, and seek to the new end-of-file.
    ///
    /// Always the fresh end-of-file, never a remembered offset.
    async fn reset(&mut self) -> Result<(), CoreError> {
        let (file, cursor) = self.store.open_at_end().await?;
        tracing::debug!(previous = self.cursor, cursor, "Tail reset after log truncation");
        self.file = file;
        self.cursor = cursor;
        Ok(())
    }
}
