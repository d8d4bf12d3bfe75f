use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use xfer_core::log_store::LogStore;
use xfer_core::truncation::TruncationCoordinator;

use crate::config::ServerConfig;
use crate::engine::JobDispatcher;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// The tailed log file.
    pub log_store: LogStore,
    /// Clears the log and notifies tail subscribers.
    pub truncation: Arc<TruncationCoordinator>,
    /// Starts image-transfer jobs in the background.
    pub dispatcher: Arc<JobDispatcher>,
    /// Cancelled on shutdown; every tail stream holds a child token.
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Wire up state from configuration and a dispatcher.
    pub fn new(config: ServerConfig, dispatcher: JobDispatcher) -> Self {
        let log_store = LogStore::new(config.log_file_path.clone());
        Self {
            config: Arc::new(config),
            truncation: Arc::new(TruncationCoordinator::new(log_store.clone())),
            log_store,
            dispatcher: Arc::new(dispatcher),
            shutdown: CancellationToken::new(),
        }
    }
}
