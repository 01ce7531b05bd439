use crate::command::journal_command;
use crate::error::{MountError, Result};
use crate::executor::CommandExecutor;
use crate::types::{CollectedLogs, DebugLogRequest};
use chrono::{Duration, Local};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, info_span, warn};

pub const DEFAULT_LOG_DIR: &str = "/tmp/mount-helper-logs";
pub const DEFAULT_WINDOW_MINS: u64 = 30;
const MAX_WINDOW_MINS: u64 = 60 * 24 * 365;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogCollectorConfig {
    /// Directory receiving `<request id>.log` files.
    pub log_dir: PathBuf,
    /// How far back the journal is read.
    pub window_mins: u64,
    /// Restrict extraction to one systemd unit.
    pub unit: Option<String>,
}

impl Default for LogCollectorConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            window_mins: DEFAULT_WINDOW_MINS,
            unit: None,
        }
    }
}

/// Captures recent host journal entries into a file named after the request id.
#[derive(Clone)]
pub struct LogCollector {
    executor: Arc<dyn CommandExecutor>,
    config: LogCollectorConfig,
}

impl LogCollector {
    pub fn new(executor: Arc<dyn CommandExecutor>, config: LogCollectorConfig) -> Self {
        Self { executor, config }
    }

    pub fn collect(&self, req: &DebugLogRequest) -> Result<CollectedLogs> {
        req.validate()?;

        let span = info_span!("debug_logs", request_id = %req.request_id);
        let _enter = span.enter();

        let window = Duration::minutes(self.config.window_mins.min(MAX_WINDOW_MINS) as i64);
        let since = (Local::now() - window).format("%Y-%m-%d %H:%M:%S").to_string();
        let command = journal_command(&since, self.config.unit.as_deref());
        info!(command = %command, "Collecting debug logs");

        let output = self.executor.execute(&command).map_err(|e| {
            warn!(error = %e, "Log collection failed");
            MountError::from(e)
        })?;

        fs::create_dir_all(&self.config.log_dir)?;
        let location = self.config.log_dir.join(format!("{}.log", req.request_id));
        fs::write(&location, output)?;

        info!(location = %location.display(), "Debug logs written");
        Ok(CollectedLogs { location })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeExecutor;
    use tempfile::TempDir;

    fn collector(executor: Arc<FakeExecutor>, dir: &TempDir) -> LogCollector {
        LogCollector::new(
            executor,
            LogCollectorConfig {
                log_dir: dir.path().join("logs"),
                window_mins: 10,
                unit: Some("mount-helper".to_string()),
            },
        )
    }

    #[test]
    fn test_collect_writes_output_named_by_request_id() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let executor = Arc::new(FakeExecutor::with_handler(|_| {
            Ok("Oct 16 mount-helper[1]: mounted /target\n".to_string())
        }));

        let logs = collector(executor.clone(), &temp_dir)
            .collect(&DebugLogRequest {
                request_id: "123".to_string(),
            })
            .expect("collect");

        assert_eq!(logs.location, temp_dir.path().join("logs").join("123.log"));
        let content = fs::read_to_string(&logs.location).expect("read log file");
        assert!(content.contains("mounted /target"));

        let calls = executor.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, "journalctl");
        assert!(calls[0].args.contains(&"--since".to_string()));
        assert_eq!(
            calls[0].args[calls[0].args.len() - 2..],
            ["--unit".to_string(), "mount-helper".to_string()]
        );
    }

    #[test]
    fn test_collect_failure_writes_nothing() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let executor = Arc::new(FakeExecutor::failing("log file creation failed"));

        let err = collector(executor, &temp_dir)
            .collect(&DebugLogRequest {
                request_id: "123".to_string(),
            })
            .expect_err("should fail");

        assert!(matches!(err, MountError::Execution(ref r) if r.contains("log file creation failed")));
        assert!(!temp_dir.path().join("logs").join("123.log").exists());
    }

    #[test]
    fn test_unwritable_log_dir_is_io_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let blocker = temp_dir.path().join("logs");
        fs::write(&blocker, "not a directory").expect("create regular file");
        let executor = Arc::new(FakeExecutor::with_handler(|_| Ok("journal".to_string())));

        let err = collector(executor.clone(), &temp_dir)
            .collect(&DebugLogRequest {
                request_id: "123".to_string(),
            })
            .expect_err("log dir is a file");

        assert!(matches!(err, MountError::Io(_)));
        assert!(!err.is_client_error());
        assert_eq!(executor.calls_to("journalctl"), 1);
        assert_eq!(
            fs::read_to_string(&blocker).expect("file untouched"),
            "not a directory"
        );
    }

    #[test]
    fn test_collect_rejects_unsafe_request_id() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let executor = Arc::new(FakeExecutor::succeeding());

        let err = collector(executor.clone(), &temp_dir)
            .collect(&DebugLogRequest {
                request_id: "../../etc/passwd".to_string(),
            })
            .expect_err("should reject");

        assert!(err.is_client_error());
        assert!(executor.calls().is_empty());
    }
}
