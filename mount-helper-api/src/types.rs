use mount_helper_core::{CollectedLogs, MountOutcome};
use serde::{Deserialize, Serialize};

pub const LIVENESS_MESSAGE: &str = "Mount-helper-container server is live!";

/// Success body shared by all mount helper endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OperationResponse {
    pub message: String,
    pub outcome: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mounted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fs_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl From<MountOutcome> for OperationResponse {
    fn from(outcome: MountOutcome) -> Self {
        let mut response = Self {
            message: outcome.message().to_string(),
            outcome: outcome.as_str().to_string(),
            mounted: None,
            device: None,
            fs_type: None,
            location: None,
        };
        if let MountOutcome::StatusReport(status) = outcome {
            response.mounted = Some(status.mounted);
            response.device = status.device;
            response.fs_type = status.fs_type;
        }
        response
    }
}

impl From<CollectedLogs> for OperationResponse {
    fn from(logs: CollectedLogs) -> Self {
        Self {
            message: "Debug logs collected".to_string(),
            outcome: "collected".to_string(),
            mounted: None,
            device: None,
            fs_type: None,
            location: Some(logs.location.display().to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LivenessResponse {
    #[serde(rename = "Message")]
    pub message: String,
}
