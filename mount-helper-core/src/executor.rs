// Standard library
use std::thread;
use std::time::{Duration, Instant};

// External crates
use duct::cmd;
use tracing::debug;

// Internal imports
use crate::command::CommandInvocation;
use crate::error::CommandError;

/// Runs an external command and captures its output.
///
/// Implementations must return the captured output on success. On failure the
/// error should carry whatever output was captured so callers can report it.
pub trait CommandExecutor: Send + Sync {
    fn execute(&self, invocation: &CommandInvocation) -> Result<String, CommandError>;
}

/// Spawns real host processes, merging stderr into stdout.
#[derive(Debug, Clone, Default)]
pub struct ProcessExecutor {
    timeout: Option<Duration>,
}

impl ProcessExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill commands that run longer than `timeout`.
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

impl CommandExecutor for ProcessExecutor {
    fn execute(&self, invocation: &CommandInvocation) -> Result<String, CommandError> {
        let full_command = invocation.to_string();
        debug!(command = %full_command, "Executing command");

        let expression = cmd(invocation.program.as_str(), &invocation.args)
            .stderr_to_stdout()
            .stdout_capture()
            .unchecked();

        let spawn_error = |e: std::io::Error| CommandError::Spawn {
            command: full_command.clone(),
            reason: e.to_string(),
        };

        let (status, stdout) = match self.timeout {
            None => {
                let output = expression.run().map_err(spawn_error)?;
                (output.status, output.stdout)
            }
            Some(timeout) => {
                let handle = expression.start().map_err(spawn_error)?;
                let start = Instant::now();

                loop {
                    if start.elapsed() >= timeout {
                        let _ = handle.kill();
                        return Err(CommandError::Timeout {
                            command: full_command,
                            timeout,
                        });
                    }

                    match handle.try_wait() {
                        Ok(Some(output)) => break (output.status, output.stdout.clone()),
                        Ok(None) => thread::sleep(Duration::from_millis(50)),
                        Err(e) => {
                            return Err(CommandError::Other(format!(
                                "Error waiting for command '{}': {}",
                                full_command, e
                            )))
                        }
                    }
                }
            }
        };

        let output = String::from_utf8_lossy(&stdout).into_owned();
        if status.success() {
            Ok(output)
        } else {
            Err(CommandError::Exit {
                command: full_command,
                code: status.code(),
                output: output.trim().to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> CommandInvocation {
        CommandInvocation::new("sh").args(["-c", script])
    }

    #[test]
    fn test_captures_stdout_and_stderr() {
        let output = ProcessExecutor::new()
            .execute(&sh("echo out; echo err >&2"))
            .expect("command should succeed");
        assert!(output.contains("out"));
        assert!(output.contains("err"));
    }

    #[test]
    fn test_nonzero_exit_reports_code_and_output() {
        let err = ProcessExecutor::new()
            .execute(&sh("echo 'mount: permission denied' >&2; exit 32"))
            .expect_err("command should fail");
        assert_eq!(err.exit_code(), Some(32));
        assert_eq!(err.output(), Some("mount: permission denied"));
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let err = ProcessExecutor::new()
            .execute(&CommandInvocation::new("definitely-not-a-real-binary-xyz"))
            .expect_err("spawn should fail");
        assert!(matches!(err, CommandError::Spawn { .. }));
    }

    #[test]
    fn test_timeout_kills_command() {
        let executor = ProcessExecutor::with_timeout(Some(Duration::from_millis(200)));
        let err = executor
            .execute(&sh("sleep 5"))
            .expect_err("command should time out");
        assert!(matches!(err, CommandError::Timeout { .. }));
        assert!(err.to_string().contains("timed out after 200ms"), "{err}");
    }

    #[test]
    fn test_timeout_not_hit_for_fast_command() {
        let executor = ProcessExecutor::with_timeout(Some(Duration::from_secs(5)));
        let output = executor.execute(&sh("echo done")).expect("should succeed");
        assert_eq!(output.trim(), "done");
    }
}
