#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use xfer_api::config::{BasicAuthConfig, ServerConfig};
use xfer_api::engine::JobDispatcher;
use xfer_api::router::build_app_router;
use xfer_api::state::AppState;
use xfer_core::job::TransferConfig;
use xfer_core::log_store::LogStore;
use xfer_core::transfer::{ExecutionError, TransferClient, TransferClientFactory};

/// Build a test `ServerConfig` rooted in `dir`.
///
/// The log file lives at `<dir>/logs/app.log`, tails poll every 20ms and
/// Basic auth is off.
pub fn test_config(dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["*".to_string()],
        request_timeout_secs: 30,
        log_file_path: dir.join("logs").join("app.log"),
        tail_poll_interval_ms: 20,
        tail_read_buffer_bytes: 1024,
        static_dir: dir.join("static"),
        transfer_binary: "image-transfer".to_string(),
        transfer_work_dir: dir.join("jobs"),
        transfer_routines: Some(4),
        basic_auth: None,
    }
}

/// A self-contained gateway: temp directory, state and router.
pub struct TestApp {
    pub dir: TempDir,
    pub state: AppState,
    pub app: Router,
}

impl TestApp {
    /// `<dir>/logs/app.log` exists and is empty; transfers never finish.
    pub fn new() -> Self {
        Self::with(|_| {}, Arc::new(BlockingFactory))
    }

    pub fn with_factory(factory: Arc<dyn TransferClientFactory>) -> Self {
        Self::with(|_| {}, factory)
    }

    pub fn with_basic_auth(username: &str, password: &str) -> Self {
        let auth = BasicAuthConfig {
            username: username.to_string(),
            password: password.to_string(),
        };
        Self::with(move |c| c.basic_auth = Some(auth), Arc::new(BlockingFactory))
    }

    pub fn with(
        customize: impl FnOnce(&mut ServerConfig),
        factory: Arc<dyn TransferClientFactory>,
    ) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path());
        customize(&mut config);

        let default_log = dir.path().join("logs").join("app.log");
        std::fs::create_dir_all(dir.path().join("logs")).unwrap();
        std::fs::write(&default_log, b"").unwrap();

        let dispatcher = JobDispatcher::new(factory, config.transfer_routines.unwrap_or(1));
        let state = AppState::new(config.clone(), dispatcher);
        let app = build_app_router(state.clone(), &config);

        Self { dir, state, app }
    }

    pub fn store(&self) -> &LogStore {
        &self.state.log_store
    }

    /// A fresh router over the same state (routers are consumed by `oneshot`).
    pub fn router(&self) -> Router {
        build_app_router(self.state.clone(), &self.state.config)
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Serve `app` on an ephemeral loopback port.
pub async fn spawn_server(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

// ---------------------------------------------------------------------------
// Transfer client fakes
// ---------------------------------------------------------------------------

/// Runs that never complete.
pub struct BlockingFactory;

struct BlockingClient;

#[async_trait]
impl TransferClient for BlockingClient {
    async fn run(self: Box<Self>) -> Result<(), ExecutionError> {
        std::future::pending::<()>().await;
        Ok(())
    }
}

impl TransferClientFactory for BlockingFactory {
    fn build(&self, _config: TransferConfig) -> Result<Box<dyn TransferClient>, ExecutionError> {
        Ok(Box::new(BlockingClient))
    }
}

/// Client construction always fails.
pub struct UnavailableFactory;

impl TransferClientFactory for UnavailableFactory {
    fn build(&self, _config: TransferConfig) -> Result<Box<dyn TransferClient>, ExecutionError> {
        Err(ExecutionError::Unavailable("transfer binary not installed".into()))
    }
}

/// Records every built config; runs succeed immediately.
#[derive(Default)]
pub struct RecordingFactory {
    pub seen: Mutex<Vec<TransferConfig>>,
}

struct ImmediateClient(Result<(), i32>);

#[async_trait]
impl TransferClient for ImmediateClient {
    async fn run(self: Box<Self>) -> Result<(), ExecutionError> {
        self.0.map_err(|code| ExecutionError::Exited { code })
    }
}

impl TransferClientFactory for RecordingFactory {
    fn build(&self, config: TransferConfig) -> Result<Box<dyn TransferClient>, ExecutionError> {
        self.seen.lock().unwrap().push(config);
        Ok(Box::new(ImmediateClient(Ok(()))))
    }
}

/// Runs that exit with the given non-zero code.
pub struct ExitingFactory(pub i32);

impl TransferClientFactory for ExitingFactory {
    fn build(&self, _config: TransferConfig) -> Result<Box<dyn TransferClient>, ExecutionError> {
        Ok(Box::new(ImmediateClient(Err(self.0))))
    }
}

/// Poll `path` until it contains `needle` or `timeout` elapses.
pub async fn wait_for_file_contains(path: &Path, needle: &str, timeout: Duration) -> String {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        let contents = tokio::fs::read_to_string(path).await.unwrap_or_default();
        if contents.contains(needle) || tokio::time::Instant::now() >= deadline {
            return contents;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
