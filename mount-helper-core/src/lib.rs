//! Mount lifecycle business logic
//!
//! This crate decides how to satisfy mount, unmount and status requests
//! against the host mount table and runs the resulting commands through an
//! injectable [`CommandExecutor`]. It is consumed by the mount-helper-api HTTP
//! service but has no knowledge of HTTP.

pub mod collector;
pub mod command;
pub mod error;
pub mod executor;
pub mod locks;
pub mod orchestrator;
pub mod probe;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use collector::{LogCollector, LogCollectorConfig};
pub use command::CommandInvocation;
pub use error::{CommandError, MountError, Result};
pub use executor::{CommandExecutor, ProcessExecutor};
pub use orchestrator::MountOrchestrator;
pub use probe::MountProber;
pub use types::{
    CollectedLogs, DebugLogRequest, MountOutcome, MountRequest, MountStatus, StatusRequest,
    UnmountRequest,
};
