//! Construction of the fixed set of host commands the sidecar runs.

use std::fmt::{self, Display, Formatter};

pub const MOUNT_BIN: &str = "mount";
pub const UMOUNT_BIN: &str = "umount";
pub const FINDMNT_BIN: &str = "findmnt";
pub const JOURNALCTL_BIN: &str = "journalctl";

/// Filesystem type served by the IBM file share mount helper.
pub const FS_TYPE_IBMSHARE: &str = "ibmshare";
/// Pseudo filesystem type requesting a bind mount of the staging path.
pub const FS_TYPE_BIND: &str = "bind";

/// A program plus its ordered arguments, built per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandInvocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl Display for CommandInvocation {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Mount command for `source` onto `target`; flags depend on the filesystem type.
pub fn mount_command(fs_type: &str, source: &str, target: &str) -> CommandInvocation {
    let cmd = CommandInvocation::new(MOUNT_BIN);
    let cmd = match fs_type {
        FS_TYPE_IBMSHARE => cmd.args(["-t", FS_TYPE_IBMSHARE, "-o", "secure=true"]),
        FS_TYPE_BIND => cmd.arg("--bind"),
        other => cmd.args(["-t", other]),
    };
    cmd.args(["--", source, target])
}

pub fn umount_command(target: &str) -> CommandInvocation {
    CommandInvocation::new(UMOUNT_BIN).args(["--", target])
}

/// Mount table lookup restricted to an exact mount point.
///
/// Output is one `SOURCE="..." FSTYPE="..."` line, or nothing with exit code 1
/// when the path is not a mount point.
pub fn probe_command(target: &str) -> CommandInvocation {
    CommandInvocation::new(FINDMNT_BIN).args([
        "--noheadings",
        "--pairs",
        "--output",
        "SOURCE,FSTYPE",
        "--mountpoint",
        target,
    ])
}

/// Journal extraction since `since` (journalctl time syntax), optionally for one unit.
pub fn journal_command(since: &str, unit: Option<&str>) -> CommandInvocation {
    let cmd = CommandInvocation::new(JOURNALCTL_BIN).args([
        "--no-pager",
        "--output",
        "short-iso",
        "--since",
        since,
    ]);
    match unit {
        Some(unit) => cmd.args(["--unit", unit]),
        None => cmd,
    }
}
