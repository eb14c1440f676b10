//! Command Runner
//!
//! Splits a command string on whitespace and runs it as a child process,
//! capturing stdout and stderr. No shell is involved: quotes, pipes,
//! redirection and variables are passed through as literal characters.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use thiserror::Error;
use tokio::process::Command;

use crate::api::ExecuteResponse;

/// Result of running a command to completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Exit code, `None` if the process was killed by a signal
    pub exit_code: Option<i32>,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl ExecutionResult {
    /// Whether the process exited with code 0
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Pick the response body by exit code: stdout on success, stderr otherwise
    pub fn into_response(self) -> ExecuteResponse {
        if self.success() {
            ExecuteResponse::Output(self.stdout)
        } else {
            ExecuteResponse::Error(self.stderr)
        }
    }
}

/// Errors raised before the process could run
#[derive(Debug, Error)]
pub enum CommandError {
    /// The command contained no tokens
    #[error("No executable specified")]
    EmptyCommand,

    /// Binary not found in PATH
    #[error("Binary '{0}' not found. Install it or add to PATH.")]
    BinaryNotFound(String),

    /// The binary exists but could not be executed
    #[error("Permission denied executing '{0}'")]
    PermissionDenied(String),

    /// Any other spawn or wait failure
    #[error("Failed to launch process: {0}")]
    LaunchFailed(String),
}

/// Split a command on runs of whitespace into literal tokens
pub fn tokenize(command: &str) -> Vec<&str> {
    command.split_whitespace().collect()
}

/// Runner for caller-supplied commands. Holds no state, so one instance
/// serves every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandRunner;

impl CommandRunner {
    pub fn new() -> Self {
        Self
    }

    /// Find a binary: paths are taken as-is, bare names are looked up in PATH
    pub fn resolve(binary: &str) -> Result<PathBuf, CommandError> {
        let path = Path::new(binary);
        if path.components().count() > 1 {
            return Ok(path.to_path_buf());
        }
        which::which(binary).map_err(|_| CommandError::BinaryNotFound(binary.to_string()))
    }

    /// Run a command and wait for it to exit
    pub async fn run(&self, command: &str) -> Result<ExecutionResult, CommandError> {
        let tokens = tokenize(command);
        let (binary, args) = tokens.split_first().ok_or(CommandError::EmptyCommand)?;

        // The child sees the token as typed in argv[0], not the resolved path
        let binary_path = Self::resolve(binary)?;
        tracing::debug!(
            "Running {} ({}) with {} argument(s)",
            binary,
            binary_path.display(),
            args.len()
        );

        let output = Command::new(binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| spawn_error(binary, e))?;

        let result = ExecutionResult {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        tracing::debug!("{} exited with {:?}", binary, result.exit_code);

        Ok(result)
    }
}

fn spawn_error(binary: &str, e: io::Error) -> CommandError {
    match e.kind() {
        io::ErrorKind::NotFound => CommandError::BinaryNotFound(binary.to_string()),
        io::ErrorKind::PermissionDenied => CommandError::PermissionDenied(binary.to_string()),
        _ => CommandError::LaunchFailed(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_collapses_whitespace() {
        assert_eq!(tokenize("echo  a   b"), vec!["echo", "a", "b"]);
        assert_eq!(tokenize("  ls\t-la\n/tmp "), vec!["ls", "-la", "/tmp"]);
    }

    #[test]
    fn test_tokenize_keeps_quotes_literal() {
        assert_eq!(tokenize(r#"echo "a b""#), vec!["echo", "\"a", "b\""]);
        assert_eq!(tokenize("echo $HOME | wc"), vec!["echo", "$HOME", "|", "wc"]);
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" \t\n ").is_empty());
    }

    #[test]
    fn test_into_response_by_exit_code() {
        let ok = ExecutionResult {
            exit_code: Some(0),
            stdout: "out".to_string(),
            stderr: "err".to_string(),
        };
        assert_eq!(ok.into_response(), ExecuteResponse::Output("out".to_string()));

        let failed = ExecutionResult {
            exit_code: Some(2),
            stdout: "out".to_string(),
            stderr: "err".to_string(),
        };
        assert_eq!(failed.into_response(), ExecuteResponse::Error("err".to_string()));

        let killed = ExecutionResult {
            exit_code: None,
            stdout: String::new(),
            stderr: String::new(),
        };
        assert!(!killed.success());
        assert_eq!(killed.into_response(), ExecuteResponse::Error(String::new()));
    }

    #[test]
    fn test_error_display() {
        let err = CommandError::BinaryNotFound("nope".to_string());
        assert!(err.to_string().contains("nope"));

        let err = CommandError::EmptyCommand;
        assert!(err.to_string().contains("No executable"));
    }

    #[tokio::test]
    async fn test_run_empty_command() {
        let err = CommandRunner::new().run("   ").await.unwrap_err();
        assert!(matches!(err, CommandError::EmptyCommand));
    }

    #[tokio::test]
    async fn test_run_missing_binary() {
        let err = CommandRunner::new()
            .run("definitely-not-a-real-binary-xyz --flag")
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::BinaryNotFound(ref b) if b == "definitely-not-a-real-binary-xyz"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_echo() {
        let result = CommandRunner::new().run("echo  hello   world").await.unwrap();
        assert_eq!(result.exit_code, Some(0));
        assert_eq!(result.stdout, "hello world\n");
        assert_eq!(result.stderr, "");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_passes_quotes_literally() {
        let result = CommandRunner::new().run(r#"echo "a b""#).await.unwrap();
        assert_eq!(result.stdout, "\"a b\"\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_false() {
        let result = CommandRunner::new().run("false").await.unwrap();
        assert_eq!(result.exit_code, Some(1));
        assert_eq!(result.into_response(), ExecuteResponse::Error(String::new()));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_captures_stderr_on_failure() {
        let result = CommandRunner::new()
            .run("ls /nonexistent-path-xyz")
            .await
            .unwrap();
        assert!(!result.success());
        assert!(result.stderr.contains("nonexistent-path-xyz"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_stderr_is_exact() {
        let result = CommandRunner::new()
            .run("ls /nonexistent-path-xyz")
            .await
            .unwrap();
        assert!(result.stderr.starts_with("ls: "), "stderr was {:?}", result.stderr);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_keeps_program_name_as_typed() {
        let result = CommandRunner::new().run("sh -c echo$IFS$0").await.unwrap();
        assert_eq!(result.exit_code, Some(0));
        assert_eq!(result.stdout, "sh\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_permission_denied() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("not-executable.sh");
        std::fs::write(&script, "#!/bin/sh\necho hi\n").unwrap();

        let err = CommandRunner::new()
            .run(&script.display().to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::PermissionDenied(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_missing_path() {
        let err = CommandRunner::new()
            .run("/nonexistent-dir-xyz/tool")
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::BinaryNotFound(_)));
    }
}
