use std::net::SocketAddr;
use std::sync::Arc;

use xfer_api::config::ServerConfig;
use xfer_api::engine::JobDispatcher;
use xfer_api::logging;
use xfer_api::router::build_app_router;
use xfer_api::state::AppState;
use xfer_core::job::concurrency_degree;
use xfer_core::log_store::LogStore;
use xfer_core::transfer::subprocess::SubprocessTransferFactory;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Configuration ---
    let config = ServerConfig::from_env();

    // --- Tracing (stdout + tailed log file) ---
    let log_store = LogStore::new(config.log_file_path.clone());
    let log_guard = logging::init(&log_store).expect("Failed to initialize logging");
    tracing::info!(
        host = %config.host,
        port = config.port,
        log_file = %log_store.path().display(),
        "Loaded server configuration"
    );

    // --- Transfer dispatcher ---
    let routine_nums = concurrency_degree(config.transfer_routines);
    let factory = Arc::new(SubprocessTransferFactory::new(
        config.transfer_binary.clone(),
        config.transfer_work_dir.clone(),
    ));
    let dispatcher = JobDispatcher::new(factory, routine_nums);
    tracing::info!(
        binary = %config.transfer_binary,
        routine_nums,
        basic_auth = config.basic_auth.is_some(),
        "Transfer dispatcher ready"
    );

    // --- App state ---
    let state = AppState::new(config.clone(), dispatcher);
    let shutdown = state.shutdown.clone();

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            // Tail streams never end on their own; release them so open
            // WebSocket connections can drain.
            shutdown.cancel();
        })
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
    log_guard.flush();
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
