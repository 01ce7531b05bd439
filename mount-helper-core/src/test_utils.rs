//! Deterministic stand-ins for host command execution.

use crate::command::{CommandInvocation, FINDMNT_BIN, MOUNT_BIN, UMOUNT_BIN};
use crate::error::CommandError;
use crate::executor::CommandExecutor;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

type Handler = dyn Fn(&CommandInvocation) -> Result<String, CommandError> + Send + Sync;

/// Records every invocation and answers from a handler closure.
pub struct FakeExecutor {
    calls: Mutex<Vec<CommandInvocation>>,
    handler: Box<Handler>,
}

impl FakeExecutor {
    pub fn with_handler<F>(handler: F) -> Self
    where
        F: Fn(&CommandInvocation) -> Result<String, CommandError> + Send + Sync + 'static,
    {
        Self {
            calls: Mutex::new(Vec::new()),
            handler: Box::new(handler),
        }
    }

    /// Every command succeeds with empty output.
    pub fn succeeding() -> Self {
        Self::with_handler(|_| Ok(String::new()))
    }

    /// Every command fails with `message`.
    pub fn failing(message: &str) -> Self {
        let message = message.to_string();
        Self::with_handler(move |_| Err(CommandError::Other(message.clone())))
    }

    /// Simulates a host mount table: findmnt, mount and umount read and
    /// update `table` (target path -> (device, fs type)).
    pub fn with_mount_table(table: FakeMountTable) -> Self {
        Self::with_handler(move |cmd| table.handle(cmd))
    }

    pub fn calls(&self) -> Vec<CommandInvocation> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn calls_to(&self, program: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.program == program)
            .count()
    }
}

impl CommandExecutor for FakeExecutor {
    fn execute(&self, invocation: &CommandInvocation) -> Result<String, CommandError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(invocation.clone());
        }
        (self.handler)(invocation)
    }
}

/// Shared in-memory mount table backing [`FakeExecutor::with_mount_table`].
#[derive(Clone, Default)]
pub struct FakeMountTable {
    mounts: Arc<Mutex<HashMap<String, (String, String)>>>,
}

impl FakeMountTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, target: &str, device: &str, fs_type: &str) {
        if let Ok(mut mounts) = self.mounts.lock() {
            mounts.insert(target.to_string(), (device.to_string(), fs_type.to_string()));
        }
    }

    pub fn is_mounted(&self, target: &str) -> bool {
        self.mounts
            .lock()
            .map(|m| m.contains_key(target))
            .unwrap_or(false)
    }

    fn handle(&self, cmd: &CommandInvocation) -> Result<String, CommandError> {
        let mut mounts = self
            .mounts
            .lock()
            .map_err(|e| CommandError::Other(e.to_string()))?;
        let target = cmd.args.last().cloned().unwrap_or_default();

        match cmd.program.as_str() {
            FINDMNT_BIN => match mounts.get(&target) {
                Some((device, fs_type)) => {
                    Ok(format!("SOURCE=\"{}\" FSTYPE=\"{}\"\n", device, fs_type))
                }
                None => Err(CommandError::Exit {
                    command: cmd.to_string(),
                    code: Some(1),
                    output: String::new(),
                }),
            },
            MOUNT_BIN => {
                if mounts.contains_key(&target) {
                    return Err(CommandError::Exit {
                        command: cmd.to_string(),
                        code: Some(32),
                        output: format!("mount: {}: already mounted", target),
                    });
                }
                let source = cmd
                    .args
                    .iter()
                    .rev()
                    .nth(1)
                    .cloned()
                    .unwrap_or_default();
                let fs_type = cmd
                    .args
                    .iter()
                    .position(|a| a == "-t")
                    .and_then(|i| cmd.args.get(i + 1).cloned())
                    .unwrap_or_else(|| "none".to_string());
                mounts.insert(target, (source, fs_type));
                Ok(String::new())
            }
            UMOUNT_BIN => match mounts.remove(&target) {
                Some(_) => Ok(String::new()),
                None => Err(CommandError::Exit {
                    command: cmd.to_string(),
                    code: Some(32),
                    output: format!("umount: {}: not mounted.", target),
                }),
            },
            _ => Ok(String::new()),
        }
    }
}
