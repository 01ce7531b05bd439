use crate::command::{mount_command, umount_command};
use crate::error::{MountError, Result};
use crate::executor::CommandExecutor;
use crate::locks::PathLocks;
use crate::probe::MountProber;
use crate::types::{MountOutcome, MountRequest, StatusRequest, UnmountRequest};
use std::sync::Arc;
use tracing::{info, info_span, warn};

/// Decides which host command a mount lifecycle request needs and runs it.
///
/// Mount and unmount of the same target path are serialized in-process; status
/// queries are never serialized and never mutate the mount table.
#[derive(Clone)]
pub struct MountOrchestrator {
    executor: Arc<dyn CommandExecutor>,
    prober: MountProber,
    locks: PathLocks,
}

impl MountOrchestrator {
    pub fn new(executor: Arc<dyn CommandExecutor>) -> Self {
        Self {
            prober: MountProber::new(Arc::clone(&executor)),
            executor,
            locks: PathLocks::new(),
        }
    }

    /// Mount the staging path onto the target, unless the target is already mounted.
    pub fn mount(&self, req: &MountRequest) -> Result<MountOutcome> {
        req.validate()?;

        let span = info_span!(
            "mount",
            request_id = %req.request_id,
            target = %req.target_path,
            fs_type = %req.fs_type
        );
        let _enter = span.enter();
        let _guard = self.locks.acquire(&req.target_path);

        let status = self.prober.probe(&req.target_path)?;
        if status.mounted {
            info!(
                device = status.device.as_deref().unwrap_or(""),
                "Target already mounted, skipping mount"
            );
            return Ok(MountOutcome::AlreadyMounted);
        }

        let command = mount_command(&req.fs_type, &req.staging_target_path, &req.target_path);
        info!(command = %command, "Mounting");

        match self.executor.execute(&command) {
            Ok(_) => {
                info!("Mount succeeded");
                Ok(MountOutcome::Mounted)
            }
            Err(e) => {
                warn!(error = %e, "Mount failed");
                Err(MountError::from(e))
            }
        }
    }

    /// Unmount the target, unless it is not mounted.
    pub fn unmount(&self, req: &UnmountRequest) -> Result<MountOutcome> {
        req.validate()?;

        let span = info_span!("unmount", target = %req.target_path);
        let _enter = span.enter();
        let _guard = self.locks.acquire(&req.target_path);

        let status = self.prober.probe(&req.target_path)?;
        if !status.mounted {
            info!("Target not mounted, skipping unmount");
            return Ok(MountOutcome::NotMounted);
        }

        let command = umount_command(&req.target_path);
        info!(command = %command, "Unmounting");

        match self.executor.execute(&command) {
            Ok(_) => {
                info!("Unmount succeeded");
                Ok(MountOutcome::Unmounted)
            }
            Err(e) => {
                warn!(error = %e, "Unmount failed");
                Err(MountError::from(e))
            }
        }
    }

    /// Report the current mount state of the target.
    pub fn status(&self, req: &StatusRequest) -> Result<MountOutcome> {
        req.validate()?;

        let span = info_span!("mount_status", target = %req.target_path);
        let _enter = span.enter();

        let status = self.prober.probe(&req.target_path)?;
        Ok(MountOutcome::StatusReport(status))
    }
}
