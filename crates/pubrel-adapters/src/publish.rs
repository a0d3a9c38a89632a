//! Running the external publish command

use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};

use pubrel_core::config::PublishConfig;
use pubrel_core::error::{PublishError, Result};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

/// Captured result of a publish command that ran to completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishOutput {
    /// Whether the command exited successfully
    pub success: bool,
    /// Exit code, absent when the process was killed by a signal
    pub exit_code: Option<i32>,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
}

impl PublishOutput {
    /// Exit code for display
    pub fn code_label(&self) -> String {
        self.exit_code
            .map(|code| code.to_string())
            .unwrap_or_else(|| "signal".to_string())
    }
}

/// Publishes a single package directory
pub trait Publisher: Send + Sync {
    /// Human-readable command line
    fn describe(&self) -> String;

    /// Publish the package in `package_dir`.
    ///
    /// Returns the captured output when the command ran, even if it failed.
    /// Errors mean the command could not be run or did not finish.
    fn publish(&self, package_dir: &Path) -> Result<PublishOutput>;
}

/// Publisher that runs an external command (by default
/// `dart pub publish --skip-validation`) with its confirmation prompt
/// pre-answered on stdin
#[derive(Debug, Clone)]
pub struct CommandPublisher {
    command: String,
    args: Vec<String>,
    stdin: String,
    timeout: Duration,
}

impl CommandPublisher {
    /// Create a publisher for `command` with no arguments, no stdin input and
    /// the default timeout
    pub fn new(command: impl Into<String>) -> Self {
        let defaults = PublishConfig::default();
        Self {
            command: command.into(),
            args: Vec::new(),
            stdin: String::new(),
            timeout: defaults.timeout(),
        }
    }

    /// Create a publisher from configuration
    pub fn from_config(config: &PublishConfig) -> Self {
        Self::new(config.command.clone())
            .with_args(config.args.iter().cloned())
            .with_stdin(config.stdin.clone())
            .with_timeout(config.timeout())
    }

    /// Set the command arguments
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Set the text written to the command's stdin
    pub fn with_stdin(mut self, stdin: impl Into<String>) -> Self {
        self.stdin = stdin.into();
        self
    }

    /// Set how long to wait before the command is killed
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Timeout applied to each run
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn run(&self, package_dir: &Path) -> Result<PublishOutput> {
        let command_line = self.describe();
        let start = Instant::now();

        let mut cmd = Command::new(&self.command);
        cmd.args(&self.args)
            .current_dir(package_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PublishError::ToolNotFound(self.command.clone())
            } else {
                PublishError::Spawn {
                    command: command_line.clone(),
                    reason: e.to_string(),
                }
            }
        })?;

        // Stdin is fed while output is collected, both under the timeout
        let stdin = child.stdin.take();
        let answer = self.stdin.as_bytes();
        let feed = async move {
            if let Some(mut stdin) = stdin {
                if !answer.is_empty() {
                    if let Err(e) = stdin.write_all(answer).await {
                        debug!(error = %e, "publish command closed stdin early");
                    }
                }
            }
        };
        let exchange = async move {
            let ((), output) = tokio::join!(feed, child.wait_with_output());
            output
        };

        let output = match tokio::time::timeout(self.timeout, exchange).await {
            Ok(output) => output.map_err(|e| PublishError::Spawn {
                command: command_line.clone(),
                reason: e.to_string(),
            })?,
            Err(_) => {
                warn!(command = %command_line, "publish command timed out, killed");
                return Err(PublishError::Timeout {
                    command: command_line,
                    seconds: self.timeout.as_secs(),
                }
                .into());
            }
        };

        Ok(PublishOutput {
            success: output.status.success(),
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}

impl Publisher for CommandPublisher {
    fn describe(&self) -> String {
        std::iter::once(self.command.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[instrument(skip(self), fields(command = %self.describe()))]
    fn publish(&self, package_dir: &Path) -> Result<PublishOutput> {
        if !package_dir.is_dir() {
            return Err(PublishError::PackageDirNotFound(package_dir.to_path_buf()).into());
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let output = runtime.block_on(self.run(package_dir))?;

        info!(
            success = output.success,
            exit_code = ?output.exit_code,
            duration_ms = output.duration_ms,
            "publish command finished"
        );
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pubrel_core::PubrelError;
    use tempfile::TempDir;

    #[test]
    fn test_from_config() {
        let publisher = CommandPublisher::from_config(&PublishConfig::default());
        assert_eq!(publisher.describe(), "dart pub publish --skip-validation");
        assert_eq!(publisher.stdin, "y\n");
        assert_eq!(publisher.timeout(), Duration::from_secs(300));
    }

    #[test]
    fn test_missing_directory() {
        let temp = TempDir::new().unwrap();
        let result = CommandPublisher::new("true").publish(&temp.path().join("gone"));
        assert!(matches!(
            result,
            Err(PubrelError::Publish(PublishError::PackageDirNotFound(_)))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_successful_command() {
        let temp = TempDir::new().unwrap();
        let output = CommandPublisher::new("sh")
            .with_args(["-c", "echo published"])
            .publish(temp.path())
            .unwrap();

        assert!(output.success);
        assert_eq!(output.exit_code, Some(0));
        assert_eq!(output.stdout, "published\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_runs_in_package_directory() {
        let temp = TempDir::new().unwrap();
        let package = temp.path().join("gpu_tensor");
        std::fs::create_dir(&package).unwrap();

        let output = CommandPublisher::new("sh")
            .with_args(["-c", "pwd"])
            .publish(&package)
            .unwrap();

        assert!(output.stdout.trim_end().ends_with("gpu_tensor"));
    }

    #[cfg(unix)]
    #[test]
    fn test_stdin_answers_prompt() {
        let temp = TempDir::new().unwrap();
        let output = CommandPublisher::new("sh")
            .with_args(["-c", "read answer; echo \"answer=$answer\""])
            .with_stdin("y\n")
            .publish(temp.path())
            .unwrap();

        assert!(output.success);
        assert_eq!(output.stdout, "answer=y\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_command_is_captured() {
        let temp = TempDir::new().unwrap();
        let output = CommandPublisher::new("sh")
            .with_args(["-c", "echo boom >&2; exit 3"])
            .publish(temp.path())
            .unwrap();

        assert!(!output.success);
        assert_eq!(output.exit_code, Some(3));
        assert_eq!(output.code_label(), "3");
        assert_eq!(output.stderr, "boom\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_missing_tool() {
        let temp = TempDir::new().unwrap();
        let result = CommandPublisher::new("pubrel-test-no-such-tool").publish(temp.path());
        assert!(matches!(
            result,
            Err(PubrelError::Publish(PublishError::ToolNotFound(ref tool)))
                if tool == "pubrel-test-no-such-tool"
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_kills_command() {
        let temp = TempDir::new().unwrap();
        let start = Instant::now();
        let result = CommandPublisher::new("sh")
            .with_args(["-c", "sleep 10"])
            .with_timeout(Duration::from_millis(200))
            .publish(temp.path());

        assert!(matches!(
            result,
            Err(PubrelError::Publish(PublishError::Timeout { .. }))
        ));
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_covers_unread_stdin() {
        let temp = TempDir::new().unwrap();
        let start = Instant::now();
        let result = CommandPublisher::new("sh")
            .with_args(["-c", "sleep 10"])
            .with_stdin("y\n".repeat(512 * 1024))
            .with_timeout(Duration::from_millis(200))
            .publish(temp.path());

        assert!(matches!(
            result,
            Err(PubrelError::Publish(PublishError::Timeout { .. }))
        ));
        assert!(start.elapsed() < Duration::from_secs(5));
    }
}
