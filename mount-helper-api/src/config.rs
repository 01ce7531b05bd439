use anyhow::{bail, Result};
use mount_helper_core::collector::{DEFAULT_LOG_DIR, DEFAULT_WINDOW_MINS};
use mount_helper_core::LogCollectorConfig;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_LISTEN_ADDRESS: &str = "127.0.0.1:7070";

/// Where the HTTP server accepts connections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenAddress {
    Tcp(String),
    Unix(PathBuf),
}

impl ListenAddress {
    /// `unix:<path>` or an absolute path selects a Unix socket, anything else is `host:port`.
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        if let Some(path) = value.strip_prefix("unix:") {
            if path.is_empty() {
                bail!("Unix socket address '{}' has no path", value);
            }
            return Ok(ListenAddress::Unix(PathBuf::from(path)));
        }
        if value.starts_with('/') {
            return Ok(ListenAddress::Unix(PathBuf::from(value)));
        }
        if value.is_empty() {
            bail!("Listen address is empty");
        }
        Ok(ListenAddress::Tcp(value.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_address: String,
    pub execution_timeout_secs: Option<u64>,
    pub debug_log_dir: PathBuf,
    pub debug_log_window_mins: u64,
    pub debug_log_unit: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_address: DEFAULT_LISTEN_ADDRESS.to_string(),
            execution_timeout_secs: None,
            debug_log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            debug_log_window_mins: DEFAULT_WINDOW_MINS,
            debug_log_unit: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration through an arbitrary variable lookup; unset or
    /// unparseable values keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            listen_address: var("MOUNT_HELPER_LISTEN")
                .or_else(|| var("SOCKET_PATH"))
                .unwrap_or(defaults.listen_address),
            execution_timeout_secs: var("MOUNT_HELPER_EXEC_TIMEOUT_SECS")
                .and_then(|s| s.trim().parse().ok())
                .filter(|secs| *secs > 0),
            debug_log_dir: var("MOUNT_HELPER_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.debug_log_dir),
            debug_log_window_mins: var("MOUNT_HELPER_LOG_WINDOW_MINS")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.debug_log_window_mins),
            debug_log_unit: var("MOUNT_HELPER_LOG_UNIT"),
        }
    }

    pub fn listen_address(&self) -> Result<ListenAddress> {
        ListenAddress::parse(&self.listen_address)
    }

    pub fn execution_timeout(&self) -> Option<Duration> {
        self.execution_timeout_secs.map(Duration::from_secs)
    }

    pub fn log_collector(&self) -> LogCollectorConfig {
        LogCollectorConfig {
            log_dir: self.debug_log_dir.clone(),
            window_mins: self.debug_log_window_mins,
            unit: self.debug_log_unit.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let c = config(&[]);
        assert_eq!(c.listen_address, DEFAULT_LISTEN_ADDRESS);
        assert_eq!(c.execution_timeout(), None);
        assert_eq!(c.log_collector(), LogCollectorConfig::default());
    }

    #[test]
    fn test_blank_values_keep_defaults() {
        let c = config(&[
            ("MOUNT_HELPER_LISTEN", "  "),
            ("MOUNT_HELPER_LOG_DIR", ""),
            ("MOUNT_HELPER_LOG_UNIT", ""),
            ("MOUNT_HELPER_EXEC_TIMEOUT_SECS", "0"),
        ]);
        assert_eq!(c.listen_address, DEFAULT_LISTEN_ADDRESS);
        assert_eq!(c.execution_timeout(), None);
        assert_eq!(c.log_collector(), LogCollectorConfig::default());
    }

    #[test]
    fn test_socket_path_selects_unix_listener() {
        let c = config(&[("SOCKET_PATH", "/var/run/mount-helper/sock")]);
        assert_eq!(
            c.listen_address().expect("valid"),
            ListenAddress::Unix(PathBuf::from("/var/run/mount-helper/sock"))
        );
    }

    #[test]
    fn test_explicit_listen_overrides_socket_path() {
        let c = config(&[
            ("SOCKET_PATH", "/var/run/mount-helper/sock"),
            ("MOUNT_HELPER_LISTEN", "0.0.0.0:9000"),
        ]);
        assert_eq!(
            c.listen_address().expect("valid"),
            ListenAddress::Tcp("0.0.0.0:9000".to_string())
        );
    }

    #[test]
    fn test_numeric_settings() {
        let c = config(&[
            ("MOUNT_HELPER_EXEC_TIMEOUT_SECS", "45"),
            ("MOUNT_HELPER_LOG_WINDOW_MINS", "5"),
            ("MOUNT_HELPER_LOG_UNIT", "kubelet"),
            ("MOUNT_HELPER_LOG_DIR", "/data/logs"),
        ]);
        assert_eq!(c.execution_timeout(), Some(Duration::from_secs(45)));
        let logs = c.log_collector();
        assert_eq!(logs.window_mins, 5);
        assert_eq!(logs.unit.as_deref(), Some("kubelet"));
        assert_eq!(logs.log_dir, PathBuf::from("/data/logs"));

        let c = config(&[
            ("MOUNT_HELPER_EXEC_TIMEOUT_SECS", "soon"),
            ("MOUNT_HELPER_LOG_WINDOW_MINS", "-1"),
        ]);
        assert_eq!(c.execution_timeout(), None);
        assert_eq!(c.debug_log_window_mins, DEFAULT_WINDOW_MINS);
    }

    #[test]
    fn test_listen_address_parsing() {
        assert_eq!(
            ListenAddress::parse("unix:/tmp/mh.sock").expect("valid"),
            ListenAddress::Unix(PathBuf::from("/tmp/mh.sock"))
        );
        assert!(ListenAddress::parse("unix:").is_err());
        assert!(ListenAddress::parse("  ").is_err());
    }
}
