//! Process logging: stdout plus the tailed log file.
//!
//! [`init`] installs the global `tracing` subscriber exactly once from
//! `main` and returns a [`LoggingGuard`]; call [`LoggingGuard::flush`]
//! before the process exits. The file layer writes through a handle opened
//! in append mode, so lines logged after a truncation start at offset 0.

use std::fs::File;
use std::io::{self, Write};
use std::sync::Arc;

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use xfer_core::error::CoreError;
use xfer_core::log_store::LogStore;

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "xfer_api=info,xfer_core=info,tower_http=info";

/// `MakeWriter` that appends formatted events to the log store.
#[derive(Clone)]
pub struct LogFileWriter {
    file: Arc<File>,
}

impl LogFileWriter {
    /// Open the store for appending (creating the file and its directory).
    pub fn open(store: &LogStore) -> Result<Self, CoreError> {
        store.ensure_parent_dir()?;
        let file = store.open_append_blocking()?;
        Ok(Self {
            file: Arc::new(file),
        })
    }
}

/// Per-event writer handed out by [`LogFileWriter`].
pub struct LogFileHandle {
    file: Arc<File>,
}

impl Write for LogFileHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        (&*self.file).write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        (&*self.file).flush()
    }
}

impl<'a> MakeWriter<'a> for LogFileWriter {
    type Writer = LogFileHandle;

    fn make_writer(&'a self) -> Self::Writer {
        LogFileHandle {
            file: Arc::clone(&self.file),
        }
    }
}

/// Keeps the log file handle for the final flush.
pub struct LoggingGuard {
    file: Arc<File>,
}

impl LoggingGuard {
    /// Flush buffered log data to disk. Call once during shutdown.
    pub fn flush(&self) {
        if let Err(e) = self.file.sync_all() {
            eprintln!("failed to flush log file: {e}");
        }
    }
}

/// Install the global subscriber: env filter, stdout layer and a plain
/// (no ANSI) file layer writing to `store`.
pub fn init(store: &LogStore) -> Result<LoggingGuard, CoreError> {
    let writer = LogFileWriter::open(store)?;
    let file = Arc::clone(&writer.file);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer),
        )
        .try_init()
        .map_err(|e| CoreError::Internal(format!("failed to install subscriber: {e}")))?;

    Ok(LoggingGuard { file })
}
