//! Transfer client backed by an external `image-transfer` executable.
//!
//! Each run writes the merged credentials and the image mapping as YAML
//! files into a private job directory, invokes
//!
//! ```text
//! <binary> --securityFile=<dir>/security.yaml --ruleFile=<dir>/rule.yaml --routineNums=<n>
//! ```
//!
//! and relays every stdout/stderr line of the child into the tracing log,
//! which is how the run's progress reaches the log tail. The job directory
//! is removed when the process exits.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tokio::process::Command;

use super::{ExecutionError, TransferClient, TransferClientFactory};
use crate::job::TransferConfig;

const SECURITY_FILE: &str = "security.yaml";
const RULE_FILE: &str = "rule.yaml";

/// Factory resolving the transfer executable once per job.
pub struct SubprocessTransferFactory {
    binary: String,
    work_root: PathBuf,
}

impl SubprocessTransferFactory {
    /// `binary` is a name looked up on `PATH`, or a path to an executable.
    /// Job directories are created under `work_root`.
    pub fn new(binary: impl Into<String>, work_root: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            work_root: work_root.into(),
        }
    }
}

impl TransferClientFactory for SubprocessTransferFactory {
    fn build(&self, config: TransferConfig) -> Result<Box<dyn TransferClient>, ExecutionError> {
        let binary = which::which(&self.binary).map_err(|e| {
            ExecutionError::Unavailable(format!("cannot locate '{}': {e}", self.binary))
        })?;
        let job_dir = self.work_root.join(uuid::Uuid::new_v4().to_string());

        Ok(Box::new(SubprocessTransfer {
            binary,
            job_dir,
            config,
        }))
    }
}

/// A single pending invocation of the transfer executable.
pub struct SubprocessTransfer {
    binary: PathBuf,
    job_dir: PathBuf,
    config: TransferConfig,
}

#[async_trait]
impl TransferClient for SubprocessTransfer {
    async fn run(self: Box<Self>) -> Result<(), ExecutionError> {
        let result = self.execute().await;
        if let Err(e) = tokio::fs::remove_dir_all(&self.job_dir).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(dir = %self.job_dir.display(), error = %e, "Failed to remove job directory");
            }
        }
        result
    }
}

impl SubprocessTransfer {
    async fn execute(&self) -> Result<(), ExecutionError> {
        let (security_path, rule_path) = self.write_config_files().await?;

        let mut cmd = Command::new(&self.binary);
        cmd.args(command_args(
            &security_path,
            &rule_path,
            self.config.routine_nums,
        ))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

        tracing::info!(
            binary = %self.binary.display(),
            images = self.config.images.len(),
            registries = self.config.security.len(),
            routine_nums = self.config.routine_nums,
            "Starting transfer process",
        );

        let mut child = cmd.spawn().map_err(ExecutionError::Spawn)?;

        let stdout_task = tokio::spawn(relay_lines(child.stdout.take(), "stdout"));
        let stderr_task = tokio::spawn(relay_lines(child.stderr.take(), "stderr"));

        let status = child.wait().await?;
        let _ = stdout_task.await;
        let _ = stderr_task.await;

        exit_result(status)
    }

    /// Create the job directory (owner-only) and write both YAML files.
    ///
    /// The security file holds registry passwords and is readable by the
    /// owner only.
    async fn write_config_files(&self) -> Result<(PathBuf, PathBuf), ExecutionError> {
        if let Some(parent) = self.job_dir.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut dir = tokio::fs::DirBuilder::new();
        #[cfg(unix)]
        dir.mode(0o700);
        dir.create(&self.job_dir).await?;

        let security_path = self.job_dir.join(SECURITY_FILE);
        let rule_path = self.job_dir.join(RULE_FILE);
        write_private(&security_path, render_yaml(&self.config.security)?.as_bytes()).await?;
        write_private(&rule_path, render_yaml(&self.config.images)?.as_bytes()).await?;

        Ok((security_path, rule_path))
    }
}

/// Write `contents` to a new file created with mode `0600` on unix.
async fn write_private(path: &Path, contents: &[u8]) -> Result<(), ExecutionError> {
    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path).await?;
    file.write_all(contents).await?;
    file.flush().await?;
    Ok(())
}

/// Command-line arguments for one run.
fn command_args(security: &Path, rule: &Path, routine_nums: usize) -> Vec<String> {
    vec![
        format!("--securityFile={}", security.display()),
        format!("--ruleFile={}", rule.display()),
        format!("--routineNums={routine_nums}"),
    ]
}

fn render_yaml<T: serde::Serialize>(value: &T) -> Result<String, ExecutionError> {
    serde_yaml::to_string(value).map_err(|e| ExecutionError::Config(e.to_string()))
}

fn exit_result(status: ExitStatus) -> Result<(), ExecutionError> {
    if status.success() {
        Ok(())
    } else {
        Err(ExecutionError::Exited {
            code: status.code().unwrap_or(-1),
        })
    }
}

/// Forward each line of a child stream into the log.
async fn relay_lines<R: AsyncRead + Unpin>(handle: Option<R>, stream: &'static str) {
    let Some(handle) = handle else {
        return;
    };
    let mut lines = BufReader::new(handle).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => tracing::info!(stream, "{line}"),
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(stream, error = %e, "Failed to read transfer output");
                break;
            }
        }
    }
}
