//! Boundary to the external image-transfer component.
//!
//! The gateway never looks inside a transfer: it builds a client from a
//! [`TransferConfig`] and calls [`TransferClient::run`] once. Building the
//! client is synchronous and may fail (reported to the HTTP caller); the
//! run itself is only ever observed through the log.

pub mod subprocess;

use async_trait::async_trait;

use crate::job::TransferConfig;

/// Errors from constructing or running a transfer.
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    /// The client could not be constructed (e.g. the transfer binary is missing).
    #[error("transfer client unavailable: {0}")]
    Unavailable(String),

    /// The run configuration could not be rendered or written.
    #[error("failed to prepare transfer config: {0}")]
    Config(String),

    #[error("failed to spawn transfer process: {0}")]
    Spawn(#[source] std::io::Error),

    /// The transfer ran and reported failure.
    #[error("transfer process exited with code {code}")]
    Exited { code: i32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One ready-to-run transfer.
#[async_trait]
pub trait TransferClient: Send {
    /// Execute the transfer to completion.
    async fn run(self: Box<Self>) -> Result<(), ExecutionError>;
}

/// Builds a [`TransferClient`] for each accepted job.
pub trait TransferClientFactory: Send + Sync {
    fn build(&self, config: TransferConfig) -> Result<Box<dyn TransferClient>, ExecutionError>;
}
