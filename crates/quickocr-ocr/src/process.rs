use std::ffi::{OsStr, OsString};
use std::io;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::error::ToolError;

/// One external tool invocation with a caller-enforced time bound
#[derive(Debug, Clone)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<OsString>,
    pub stdin: Option<Vec<u8>>,
    pub timeout: Duration,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            stdin: None,
            timeout,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn stdin(mut self, input: Vec<u8>) -> Self {
        self.stdin = Some(input);
        self
    }
}

/// Output of a tool that exited successfully
#[derive(Debug, Clone, Default)]
pub struct ToolOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ToolOutput {
    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }
}

/// Runs external tools. Non-zero exit, timeout and absence are all errors.
#[async_trait]
pub trait ToolRunner: Send + Sync {
    async fn run(&self, command: ToolCommand) -> Result<ToolOutput, ToolError>;
}

/// Runs tools as real subprocesses
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

#[async_trait]
impl ToolRunner for SystemRunner {
    async fn run(&self, command: ToolCommand) -> Result<ToolOutput, ToolError> {
        let tool = command.program.clone();

        let mut child = Command::new(&command.program)
            .args(&command.args)
            .stdin(if command.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => ToolError::Unavailable(tool.clone()),
                _ => ToolError::Io {
                    tool: tool.clone(),
                    source: e,
                },
            })?;

        // Feed stdin from a separate task so a chatty child can't deadlock on a full stdout pipe
        if let (Some(input), Some(mut pipe)) = (command.stdin, child.stdin.take()) {
            let tool = tool.clone();
            tokio::spawn(async move {
                if let Err(e) = pipe.write_all(&input).await {
                    tracing::debug!("writing stdin of {tool} failed: {e}");
                }
            });
        }

        tracing::debug!("running {} {:?}", tool, command.args);

        // Dropping the wait future on timeout drops the child, and kill_on_drop kills it
        let output = match tokio::time::timeout(command.timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|e| ToolError::Io {
                tool: tool.clone(),
                source: e,
            })?,
            Err(_) => {
                tracing::warn!("{tool} exceeded {:?}, killing it", command.timeout);
                return Err(ToolError::Timeout {
                    tool,
                    secs: command.timeout.as_secs(),
                });
            }
        };

        if !output.status.success() {
            return Err(ToolError::Failure {
                tool,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(ToolOutput {
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::time::Instant;

    use super::*;

    fn command(program: &str) -> ToolCommand {
        ToolCommand::new(program, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn missing_program_is_unavailable() {
        let err = SystemRunner
            .run(command("quickocr-no-such-tool-on-path"))
            .await
            .unwrap_err();
        assert!(err.is_unavailable(), "got {err:?}");
    }

    #[tokio::test]
    async fn non_zero_exit_is_failure() {
        let err = SystemRunner
            .run(command("sh").arg("-c").arg("echo oops >&2; exit 3"))
            .await
            .unwrap_err();
        match err {
            ToolError::Failure { code, stderr, .. } => {
                assert_eq!(code, Some(3));
                assert_eq!(stderr, "oops");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn slow_program_is_killed_at_timeout() {
        let start = Instant::now();
        let err = SystemRunner
            .run(ToolCommand::new("sleep", Duration::from_millis(200)).arg("10"))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Timeout { .. }), "got {err:?}");
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn stdin_is_forwarded() {
        let output = SystemRunner
            .run(command("cat").stdin(b"png bytes".to_vec()))
            .await
            .unwrap();
        assert_eq!(output.stdout_text(), "png bytes");
    }
}
