//! Mount table lookups.

use crate::command::probe_command;
use crate::error::{CommandError, MountError, Result};
use crate::executor::CommandExecutor;
use crate::types::MountStatus;
use std::sync::Arc;
use tracing::debug;

/// findmnt exits with 1 when nothing matched the query.
const FINDMNT_NOT_FOUND: i32 = 1;

/// Determines whether a path is currently a mount point.
///
/// The host mount table is queried on every call; nothing is cached.
#[derive(Clone)]
pub struct MountProber {
    executor: Arc<dyn CommandExecutor>,
}

impl MountProber {
    pub fn new(executor: Arc<dyn CommandExecutor>) -> Self {
        Self { executor }
    }

    pub fn probe(&self, target_path: &str) -> Result<MountStatus> {
        let invocation = probe_command(target_path);

        let output = match self.executor.execute(&invocation) {
            Ok(output) => output,
            Err(err) if is_not_found(&err) => {
                debug!(target = target_path, "Path absent from mount table");
                return Ok(MountStatus::not_mounted());
            }
            Err(err) => return Err(MountError::Probe(err.to_string())),
        };

        let status = parse_findmnt_output(&output)?;
        debug!(
            target = target_path,
            mounted = status.mounted,
            device = status.device.as_deref().unwrap_or(""),
            "Probed mount state"
        );
        Ok(status)
    }
}

fn is_not_found(err: &CommandError) -> bool {
    err.exit_code() == Some(FINDMNT_NOT_FOUND) && err.output().is_some_and(|o| o.trim().is_empty())
}

/// Parse `findmnt --pairs --output SOURCE,FSTYPE` output.
///
/// Empty output means the path is not mounted. Only the first line is used
/// because `--mountpoint` matches a single mount point; stacked mounts report
/// the same path more than once.
pub fn parse_findmnt_output(output: &str) -> Result<MountStatus> {
    let line = match output.lines().map(str::trim).find(|l| !l.is_empty()) {
        Some(line) => line,
        None => return Ok(MountStatus::not_mounted()),
    };

    let pairs = parse_pairs(line)
        .ok_or_else(|| MountError::Probe(format!("unrecognised findmnt output: {}", line)))?;

    let field = |key: &str| {
        pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.clone())
    };

    match (field("SOURCE"), field("FSTYPE")) {
        (Some(device), Some(fs_type)) => Ok(MountStatus::mounted(device, fs_type)),
        _ => Err(MountError::Probe(format!(
            "findmnt output is missing SOURCE or FSTYPE: {}",
            line
        ))),
    }
}

/// Split `KEY="value" KEY2="value 2"` into pairs, decoding `\xNN` escapes.
fn parse_pairs(line: &str) -> Option<Vec<(&str, String)>> {
    let mut pairs = Vec::new();
    let mut rest = line.trim_start();

    while !rest.is_empty() {
        let eq = rest.find('=')?;
        let key = &rest[..eq];
        if key.is_empty() || key.contains(char::is_whitespace) {
            return None;
        }

        let value_start = rest[eq + 1..].strip_prefix('"')?;
        let close = value_start.find('"')?;
        pairs.push((key, unescape(&value_start[..close])));
        rest = value_start[close + 1..].trim_start();
    }

    Some(pairs)
}

fn unescape(raw: &str) -> String {
    // Multi-byte UTF-8 characters are escaped one byte at a time.
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'\\' && bytes.get(i + 1) == Some(&b'x') {
            if let Some(byte) = raw
                .get(i + 2..i + 4)
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
            {
                out.push(byte);
                i += 4;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeExecutor;

    #[test]
    fn test_parse_mounted_line() {
        let status = parse_findmnt_output("SOURCE=\"10.0.0.5:/share\" FSTYPE=\"nfs4\"\n")
            .expect("should parse");
        assert_eq!(status, MountStatus::mounted("10.0.0.5:/share", "nfs4"));
    }

    #[test]
    fn test_parse_empty_output_is_not_mounted() {
        assert_eq!(
            parse_findmnt_output("").expect("empty is valid"),
            MountStatus::not_mounted()
        );
        assert_eq!(
            parse_findmnt_output("\n  \n").expect("blank is valid"),
            MountStatus::not_mounted()
        );
    }

    #[test]
    fn test_parse_escaped_spaces() {
        let status = parse_findmnt_output(r#"SOURCE="/dev/disk\x20one" FSTYPE="ext4""#)
            .expect("should parse");
        assert_eq!(status.device.as_deref(), Some("/dev/disk one"));
    }

    #[test]
    fn test_parse_escaped_multibyte_utf8() {
        let status = parse_findmnt_output(r#"SOURCE="/srv/caf\xc3\xa9" FSTYPE="nfs4""#)
            .expect("should parse");
        assert_eq!(status.device.as_deref(), Some("/srv/café"));
        assert_eq!(status.fs_type.as_deref(), Some("nfs4"));
    }

    #[test]
    fn test_parse_garbage_is_probe_error() {
        let err = parse_findmnt_output("TARGET SOURCE FSTYPE").expect_err("not pairs");
        assert!(matches!(err, MountError::Probe(_)));

        let err = parse_findmnt_output(r#"TARGET="/target""#).expect_err("fields missing");
        assert!(err.to_string().contains("SOURCE or FSTYPE"));
    }

    #[test]
    fn test_probe_exit_one_without_output_is_not_mounted() {
        let executor = Arc::new(FakeExecutor::with_handler(|cmd| {
            Err(CommandError::Exit {
                command: cmd.to_string(),
                code: Some(1),
                output: String::new(),
            })
        }));
        let prober = MountProber::new(executor.clone());

        let status = prober.probe("/target").expect("not found is not an error");
        assert!(!status.mounted);
        assert_eq!(executor.calls_to("findmnt"), 1);
    }

    #[test]
    fn test_probe_other_failure_is_probe_error() {
        let executor = Arc::new(FakeExecutor::failing("find mount failed"));
        let prober = MountProber::new(executor);

        let err = prober.probe("/target").expect_err("should fail");
        assert!(matches!(err, MountError::Probe(ref r) if r.contains("find mount failed")));
    }

    #[test]
    fn test_probe_exit_one_with_output_is_probe_error() {
        let executor = Arc::new(FakeExecutor::with_handler(|cmd| {
            Err(CommandError::Exit {
                command: cmd.to_string(),
                code: Some(1),
                output: "findmnt: bad usage".to_string(),
            })
        }));
        let err = MountProber::new(executor)
            .probe("/target")
            .expect_err("usage errors are failures");
        assert!(err.to_string().contains("bad usage"));
    }
}
