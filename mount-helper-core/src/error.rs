use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MountError>;

/// Failure of a single external command invocation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Failed to start command '{command}': {reason}")]
    Spawn { command: String, reason: String },

    #[error("Command '{command}' exited with code {}: {output}", exit_code_label(.code))]
    Exit {
        command: String,
        code: Option<i32>,
        output: String,
    },

    #[error("Command '{command}' timed out after {timeout:?}")]
    Timeout { command: String, timeout: Duration },

    #[error("{0}")]
    Other(String),
}

impl CommandError {
    /// Exit code of a command that ran to completion, if any.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            CommandError::Exit { code, .. } => *code,
            _ => None,
        }
    }

    /// Output captured before the command failed.
    pub fn output(&self) -> Option<&str> {
        match self {
            CommandError::Exit { output, .. } => Some(output),
            _ => None,
        }
    }
}

fn exit_code_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "none (terminated by signal)".to_string(),
    }
}

#[derive(Error, Debug)]
pub enum MountError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Failed to probe mount state: {0}")]
    Probe(String),

    #[error("Command failed: {0}")]
    Execution(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MountError {
    /// Whether the caller sent a bad request, as opposed to a host-side failure.
    pub fn is_client_error(&self) -> bool {
        matches!(self, MountError::Validation(_))
    }
}

impl From<CommandError> for MountError {
    fn from(err: CommandError) -> Self {
        MountError::Execution(err.to_string())
    }
}
