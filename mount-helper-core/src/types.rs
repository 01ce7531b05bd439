use crate::error::{MountError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Request to mount `staging_target_path` onto `target_path`.
///
/// Missing string fields deserialize as empty and are rejected by [`MountRequest::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MountRequest {
    #[serde(default)]
    pub staging_target_path: String,
    #[serde(default)]
    pub target_path: String,
    #[serde(default)]
    pub fs_type: String,
    /// Correlation id, only logged.
    #[serde(default, rename = "requestID")]
    pub request_id: String,
}

impl MountRequest {
    pub fn validate(&self) -> Result<()> {
        require_absolute("stagingTargetPath", &self.staging_target_path)?;
        require_absolute("targetPath", &self.target_path)?;
        require("fsType", &self.fs_type)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnmountRequest {
    #[serde(default)]
    pub target_path: String,
}

impl UnmountRequest {
    pub fn validate(&self) -> Result<()> {
        require_absolute("targetPath", &self.target_path)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRequest {
    #[serde(default)]
    pub target_path: String,
}

impl StatusRequest {
    pub fn validate(&self) -> Result<()> {
        require_absolute("targetPath", &self.target_path)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugLogRequest {
    #[serde(default, rename = "requestID")]
    pub request_id: String,
}

impl DebugLogRequest {
    /// The request id names the output file, so it must be a plain file name.
    pub fn validate(&self) -> Result<()> {
        require("requestID", &self.request_id)?;
        let id = self.request_id.as_str();
        if id == "." || id.contains("..") || id.contains(['/', '\\', '\0']) {
            return Err(MountError::Validation(format!(
                "requestID '{}' must not contain path separators or '..'",
                id
            )));
        }
        Ok(())
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(MountError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

/// Paths end up as positional arguments of privileged commands and must not
/// be readable as options.
fn require_absolute(field: &str, value: &str) -> Result<()> {
    require(field, value)?;
    if !value.starts_with('/') {
        return Err(MountError::Validation(format!(
            "{} '{}' must be an absolute path",
            field, value
        )));
    }
    Ok(())
}

/// Current state of a mount point as reported by the mount table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MountStatus {
    pub mounted: bool,
    pub device: Option<String>,
    pub fs_type: Option<String>,
}

impl MountStatus {
    pub fn not_mounted() -> Self {
        Self::default()
    }

    pub fn mounted(device: impl Into<String>, fs_type: impl Into<String>) -> Self {
        Self {
            mounted: true,
            device: Some(device.into()),
            fs_type: Some(fs_type.into()),
        }
    }
}

/// Successful result of an orchestrator operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountOutcome {
    Mounted,
    AlreadyMounted,
    Unmounted,
    NotMounted,
    StatusReport(MountStatus),
}

impl MountOutcome {
    /// Stable machine-readable name of the outcome.
    pub fn as_str(&self) -> &'static str {
        match self {
            MountOutcome::Mounted => "mounted",
            MountOutcome::AlreadyMounted => "already_mounted",
            MountOutcome::Unmounted => "unmounted",
            MountOutcome::NotMounted => "not_mounted",
            MountOutcome::StatusReport(_) => "status_report",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            MountOutcome::Mounted => "Request processed successfully",
            MountOutcome::AlreadyMounted => "Target path is already mounted",
            MountOutcome::Unmounted => "Request processed successfully",
            MountOutcome::NotMounted => "Target path is not mounted",
            MountOutcome::StatusReport(status) if status.mounted => "Target path is mounted",
            MountOutcome::StatusReport(_) => "Target path is not mounted",
        }
    }
}

/// Location of collected debug logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedLogs {
    pub location: PathBuf,
}
