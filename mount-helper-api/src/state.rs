use crate::config::Config;
use mount_helper_core::{
    CommandExecutor, LogCollector, LogCollectorConfig, MountOrchestrator, ProcessExecutor,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: MountOrchestrator,
    pub collector: LogCollector,
}

impl AppState {
    pub fn new(executor: Arc<dyn CommandExecutor>, logs: LogCollectorConfig) -> Self {
        Self {
            orchestrator: MountOrchestrator::new(Arc::clone(&executor)),
            collector: LogCollector::new(executor, logs),
        }
    }

    /// State backed by real host processes.
    pub fn from_config(config: &Config) -> Self {
        let executor = Arc::new(ProcessExecutor::with_timeout(config.execution_timeout()));
        Self::new(executor, config.log_collector())
    }
}
