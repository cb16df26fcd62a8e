//! Bounded-wait execution of external tools.
//!
//! Every external invocation in the pipeline goes through [`run_checked`]:
//! the child is killed when the deadline passes, and a non-zero exit is
//! reported with the captured diagnostic output so callers can distinguish
//! "tool crashed" from "tool produced garbage".

use std::process::Output;
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("failed to launch `{tool}`: {source}")]
    Launch {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{tool}` timed out after {seconds}s")]
    TimedOut { tool: String, seconds: u64 },

    #[error("`{tool}` exited with {code:?}: {stderr}")]
    Failed {
        tool: String,
        code: Option<i32>,
        stderr: String,
    },
}

/// Run a command to completion within `deadline`, capturing output.
///
/// A timeout is treated the same as a non-zero exit: the child is killed
/// and the call fails. A successful return guarantees exit status zero.
///
/// # Errors
///
/// Returns `CommandError::Launch` if the binary cannot be started,
/// `CommandError::TimedOut` past the deadline, or `CommandError::Failed`
/// for a non-zero exit (with captured stderr).
pub async fn run_checked(
    tool: &str,
    cmd: &mut Command,
    deadline: Duration,
) -> Result<Output, CommandError> {
    debug!(tool = %tool, "running external command");

    // Dropping the output future past the deadline must also reap the child
    cmd.kill_on_drop(true);

    let result = timeout(deadline, cmd.output()).await;

    let output = match result {
        Err(_) => {
            return Err(CommandError::TimedOut {
                tool: tool.to_string(),
                seconds: deadline.as_secs(),
            })
        }
        Ok(Err(source)) => {
            return Err(CommandError::Launch {
                tool: tool.to_string(),
                source,
            })
        }
        Ok(Ok(output)) => output,
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(CommandError::Failed {
            tool: tool.to_string(),
            code: output.status.code(),
            stderr,
        });
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_checked_success() {
        let mut cmd = Command::new("true");
        let output = run_checked("true", &mut cmd, Duration::from_secs(5)).await;
        assert!(output.is_ok());
    }

    #[tokio::test]
    async fn test_run_checked_nonzero_exit() {
        let mut cmd = Command::new("false");
        let err = run_checked("false", &mut cmd, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::Failed { .. }));
    }

    #[tokio::test]
    async fn test_run_checked_missing_binary() {
        let mut cmd = Command::new("definitely-not-a-real-tool-xyz");
        let err = run_checked("definitely-not-a-real-tool-xyz", &mut cmd, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::Launch { .. }));
    }

    #[tokio::test]
    async fn test_run_checked_timeout() {
        let mut cmd = Command::new("sleep");
        cmd.arg("5");
        let err = run_checked("sleep", &mut cmd, Duration::from_millis(50))
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::TimedOut { .. }));
    }
}
