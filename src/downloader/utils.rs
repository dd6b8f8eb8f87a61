// Helper functions for driving external tools

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use thiserror::Error;
use tokio::io::AsyncReadExt;
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Why a subprocess run did not produce output
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    /// Program could not be started (missing binary, permissions)
    #[error("{0}")]
    Launch(String),
    /// Program exceeded the deadline and was killed
    #[error("Timed out after {}s", .0.as_secs())]
    TimedOut(Duration),
    /// Pipes or wait failed after launch
    #[error("{0}")]
    Io(String),
}

/// Run a command to completion, collecting stdout and stderr.
///
/// With `limit` set the child is killed once the deadline passes; `None`
/// waits as long as the tool takes.
pub async fn run_output_with_timeout(
    program: &str,
    args: &[String],
    limit: Option<Duration>,
) -> Result<std::process::Output, RunError> {
    debug!(program, args = %args.join(" "), "spawning");

    let mut child = TokioCommand::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| RunError::Launch(format!("Failed to start {}: {}", program, e)))?;

    let mut stdout_pipe = child
        .stdout
        .take()
        .ok_or_else(|| RunError::Io(format!("Failed to capture stdout from {}", program)))?;
    let mut stderr_pipe = child
        .stderr
        .take()
        .ok_or_else(|| RunError::Io(format!("Failed to capture stderr from {}", program)))?;

    // Drain both pipes concurrently so a chatty child never blocks on a full pipe.
    let stdout_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        stdout_pipe
            .read_to_end(&mut buf)
            .await
            .map_err(|e| RunError::Io(format!("Failed to read stdout: {}", e)))?;
        Ok::<Vec<u8>, RunError>(buf)
    });
    let stderr_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        stderr_pipe
            .read_to_end(&mut buf)
            .await
            .map_err(|e| RunError::Io(format!("Failed to read stderr: {}", e)))?;
        Ok::<Vec<u8>, RunError>(buf)
    });

    let status = match limit {
        Some(limit) => match timeout(limit, child.wait()).await {
            Ok(status) => status,
            Err(_) => {
                warn!(program, secs = limit.as_secs(), "killing tool after deadline");
                let _ = child.kill().await;
                stdout_task.abort();
                stderr_task.abort();
                return Err(RunError::TimedOut(limit));
            }
        },
        None => child.wait().await,
    }
    .map_err(|e| RunError::Io(format!("Failed to wait for {}: {}", program, e)))?;

    let stdout = stdout_task
        .await
        .map_err(|e| RunError::Io(format!("stdout task failed: {}", e)))??;
    let stderr = stderr_task
        .await
        .map_err(|e| RunError::Io(format!("stderr task failed: {}", e)))??;

    Ok(std::process::Output {
        status,
        stdout,
        stderr,
    })
}

/// Locate an executable: well-known install paths first, then `PATH`.
pub fn find_executable(name: &str) -> Option<String> {
    let common_dirs = ["/opt/homebrew/bin", "/usr/local/bin", "/usr/bin"];
    for dir in common_dirs {
        let candidate = Path::new(dir).join(name);
        if candidate.is_file() {
            return Some(candidate.to_string_lossy().into_owned());
        }
    }

    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
        .map(|p| p.to_string_lossy().into_owned())
}

/// Whether `program args...` can be launched and exits successfully.
pub fn probe_command(program: &str, args: &[&str]) -> bool {
    std::process::Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
