//! The single append-only log file.
//!
//! Writers only ever append; the one other mutation is [`LogStore::clear`],
//! which truncates the file to zero length. Readers position themselves at
//! end-of-file and only see bytes appended afterwards.

use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncSeekExt, AsyncWriteExt};

use crate::error::CoreError;

/// Handle to the log file. Cheap to clone; holds only the path.
#[derive(Debug, Clone)]
pub struct LogStore {
    path: PathBuf,
}

impl LogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the parent directory if it does not exist yet.
    ///
    /// Called once at startup before the logging writer opens the file.
    pub fn ensure_parent_dir(&self) -> Result<(), CoreError> {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir)
                .map_err(|e| CoreError::io("Failed to create log directory", e)),
            _ => Ok(()),
        }
    }

    /// Open the file for appending with a blocking handle, creating it if
    /// absent. Used by the logging writer.
    ///
    /// Append mode means every write lands at the current end of file, so
    /// writes after a [`clear`](Self::clear) start again at offset 0.
    pub fn open_append_blocking(&self) -> Result<std::fs::File, CoreError> {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| CoreError::io("Failed to open log file for writing", e))
    }

    /// Append `bytes` to the end of the file, creating it if absent.
    pub async fn append(&self, bytes: &[u8]) -> Result<(), CoreError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| CoreError::io("Failed to open log file for writing", e))?;
        file.write_all(bytes)
            .await
            .map_err(|e| CoreError::io("Failed to append to log file", e))?;
        // tokio buffers writes in the background; flush before the handle drops.
        file.flush()
            .await
            .map_err(|e| CoreError::io("Failed to append to log file", e))
    }

    /// Truncate the file to zero length, creating it if absent.
    ///
    /// The handle is closed before returning. The parent directory is not
    /// created here.
    pub async fn clear(&self) -> Result<(), CoreError> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .await
            .map_err(|e| CoreError::io("Failed to clear log file", e))?;
        drop(file);
        Ok(())
    }

    /// Open the file for reading, positioned at the current end of file.
    ///
    /// Returns the handle and the end-of-file offset it is positioned at.
    pub async fn open_at_end(&self) -> Result<(File, u64), CoreError> {
        let mut file = File::open(&self.path)
            .await
            .map_err(|e| CoreError::io("Failed to open log file", e))?;
        let offset = file
            .seek(SeekFrom::End(0))
            .await
            .map_err(|e| CoreError::io("Failed to seek to end of log file", e))?;
        Ok((file, offset))
    }

    /// Current length of the file in bytes.
    pub async fn size(&self) -> Result<u64, CoreError> {
        tokio::fs::metadata(&self.path)
            .await
            .map(|m| m.len())
            .map_err(|e| CoreError::io("Failed to stat log file", e))
    }
}
