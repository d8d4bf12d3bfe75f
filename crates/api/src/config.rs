use std::path::PathBuf;
use std::time::Duration;

use xfer_core::tail::{TailConfig, DEFAULT_POLL_INTERVAL, DEFAULT_READ_BUFFER_BYTES};

/// Credentials required by the optional Basic auth layer.
#[derive(Clone)]
pub struct BasicAuthConfig {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for BasicAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuthConfig")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for running next to the transfer
/// binary on a single host.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// Allowed CORS origins from comma-separated `CORS_ORIGINS`; `*` allows any.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// The single append-only log file that is tailed and cleared.
    pub log_file_path: PathBuf,
    /// Pause between tail polls once end-of-file is reached.
    pub tail_poll_interval_ms: u64,
    /// Maximum bytes per read, and therefore per WebSocket frame.
    pub tail_read_buffer_bytes: usize,
    /// Directory served under `/static`, with `index.html` served at `/`.
    pub static_dir: PathBuf,
    /// Transfer executable, looked up on `PATH` unless it contains a path separator.
    pub transfer_binary: String,
    /// Where per-job config files are written.
    pub transfer_work_dir: PathBuf,
    /// Concurrency degree override; `None` uses available parallelism.
    pub transfer_routines: Option<usize>,
    /// Basic auth credentials; auth is disabled when `None`.
    pub basic_auth: Option<BasicAuthConfig>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                      |
    /// |--------------------------|------------------------------|
    /// | `HOST`                   | `0.0.0.0`                    |
    /// | `PORT`                   | `8080`                       |
    /// | `CORS_ORIGINS`           | `*`                          |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                         |
    /// | `LOG_FILE_PATH`          | `./logs/app.log`             |
    /// | `TAIL_POLL_INTERVAL_MS`  | `1000`                       |
    /// | `TAIL_READ_BUFFER_BYTES` | `1024`                       |
    /// | `STATIC_DIR`             | `./static`                   |
    /// | `TRANSFER_BINARY`        | `image-transfer`             |
    /// | `TRANSFER_WORK_DIR`      | `<tmp>/image-transfer-jobs`  |
    /// | `TRANSFER_ROUTINES`      | unset (available parallelism)|
    /// | `BASIC_AUTH_USERNAME`    | unset                        |
    /// | `BASIC_AUTH_PASSWORD`    | unset                        |
    ///
    /// Panics on unparseable numeric values; misconfiguration should fail
    /// at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let log_file_path = std::env::var("LOG_FILE_PATH")
            .unwrap_or_else(|_| "./logs/app.log".into())
            .into();

        let tail_poll_interval_ms: u64 = std::env::var("TAIL_POLL_INTERVAL_MS")
            .map(|v| v.parse().expect("TAIL_POLL_INTERVAL_MS must be a valid u64"))
            .unwrap_or(DEFAULT_POLL_INTERVAL.as_millis() as u64);

        let tail_read_buffer_bytes: usize = std::env::var("TAIL_READ_BUFFER_BYTES")
            .map(|v| v.parse().expect("TAIL_READ_BUFFER_BYTES must be a valid usize"))
            .unwrap_or(DEFAULT_READ_BUFFER_BYTES);

        let static_dir = std::env::var("STATIC_DIR")
            .unwrap_or_else(|_| "./static".into())
            .into();

        let transfer_binary =
            std::env::var("TRANSFER_BINARY").unwrap_or_else(|_| "image-transfer".into());

        let transfer_work_dir = std::env::var("TRANSFER_WORK_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| std::env::temp_dir().join("image-transfer-jobs"));

        let transfer_routines = std::env::var("TRANSFER_ROUTINES").ok().map(|v| {
            v.parse::<usize>()
                .expect("TRANSFER_ROUTINES must be a valid usize")
        });

        let basic_auth = match (
            std::env::var("BASIC_AUTH_USERNAME"),
            std::env::var("BASIC_AUTH_PASSWORD"),
        ) {
            (Ok(username), Ok(password)) => Some(BasicAuthConfig { username, password }),
            _ => None,
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            log_file_path,
            tail_poll_interval_ms,
            tail_read_buffer_bytes,
            static_dir,
            transfer_binary,
            transfer_work_dir,
            transfer_routines,
            basic_auth,
        }
    }

    /// Tail streamer settings derived from this configuration.
    pub fn tail_config(&self) -> TailConfig {
        TailConfig {
            poll_interval: Duration::from_millis(self.tail_poll_interval_ms),
            read_buffer_bytes: self.tail_read_buffer_bytes,
        }
    }
}

/// Split a comma-separated origin list, dropping blanks.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
