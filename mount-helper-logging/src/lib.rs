//! Tracing subscriber setup for the mount helper sidecar.
//!
//! Configuration is read from the environment:
//!
//! - `LOG_LEVEL`: default filter when `RUST_LOG` is unset (`info`)
//! - `LOG_OUTPUT`: `console`, `file` or `both` (`console`)
//! - `LOG_FORMAT`: `human` or `json` (`human`)
//! - `LOG_FILE_PATH`: daily-rolled log file (`/var/log/mount-helper/mount-helper.log`)

use std::{
    env,
    io::{self, Write},
    path::{Path, PathBuf},
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt::MakeWriter, prelude::*, registry, EnvFilter};

pub const DEFAULT_LOG_FILE_PATH: &str = "/var/log/mount-helper/mount-helper.log";

// --- Custom "Tee" Writer ---
struct Tee<A, B> {
    a: A,
    b: B,
}

impl<A, B> Write for Tee<A, B>
where
    A: Write,
    B: Write,
{
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let res_a = self.a.write(buf);
        let res_b = self.b.write(buf);
        res_a.or(res_b)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.a.flush()?;
        self.b.flush()
    }
}

#[derive(Clone)]
struct MakeTee<A, B> {
    make_a: A,
    make_b: B,
}

impl<'a, A, B, W1, W2> MakeWriter<'a> for MakeTee<A, B>
where
    A: MakeWriter<'a, Writer = W1>,
    B: MakeWriter<'a, Writer = W2>,
    W1: Write + 'a,
    W2: Write + 'a,
{
    type Writer = Tee<W1, W2>;
    fn make_writer(&'a self) -> Self::Writer {
        Tee {
            a: self.make_a.make_writer(),
            b: self.make_b.make_writer(),
        }
    }
}

/// Where formatted events are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    Console,
    File,
    Both,
}

impl LogOutput {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => LogOutput::File,
            "both" => LogOutput::Both,
            _ => LogOutput::Console,
        }
    }

    fn console(self) -> bool {
        matches!(self, LogOutput::Console | LogOutput::Both)
    }

    fn file(self) -> bool {
        matches!(self, LogOutput::File | LogOutput::Both)
    }
}

/// Logging settings resolved from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: String,
    pub output: LogOutput,
    pub json: bool,
    pub file_path: PathBuf,
}

impl LogSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let level = lookup("LOG_LEVEL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "info".to_string());
        let output = lookup("LOG_OUTPUT")
            .map(|v| LogOutput::parse(&v))
            .unwrap_or(LogOutput::Console);
        let json = lookup("LOG_FORMAT")
            .map(|v| v.trim().eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        let file_path = lookup("LOG_FILE_PATH")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE_PATH));

        Self {
            level,
            output,
            json,
            file_path,
        }
    }

    fn env_filter(&self) -> EnvFilter {
        let mut filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));
        for directive in ["tokio=warn", "hyper=warn"] {
            if let Ok(d) = directive.parse() {
                filter = filter.add_directive(d);
            }
        }
        filter
    }

    fn file_appender(&self) -> tracing_appender::rolling::RollingFileAppender {
        let log_dir = self
            .file_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("/tmp"));
        let log_filename = self
            .file_path
            .file_name()
            .unwrap_or("mount-helper.log".as_ref());
        tracing_appender::rolling::daily(log_dir, log_filename)
    }
}

/// Initializes the global tracing subscriber based on environment variables.
///
/// The returned guard must be held for the lifetime of the process when file
/// output is enabled, otherwise buffered lines are lost on exit.
pub fn init_subscriber() -> Option<WorkerGuard> {
    init_with(&LogSettings::from_env())
}

/// Initializes the global tracing subscriber from explicit settings.
pub fn init_with(settings: &LogSettings) -> Option<WorkerGuard> {
    let subscriber = registry().with(settings.env_filter());
    let is_json = settings.json;

    match (settings.output.console(), settings.output.file()) {
        (true, true) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(settings.file_appender());
            let tee_writer = MakeTee {
                make_a: std::io::stdout,
                make_b: non_blocking,
            };

            let fmt_layer = tracing_subscriber::fmt::layer().with_writer(tee_writer);
            if is_json {
                subscriber.with(fmt_layer.json()).init();
            } else {
                subscriber.with(fmt_layer).init();
            }
            Some(guard)
        }
        (false, true) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(settings.file_appender());

            let fmt_layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking);
            if is_json {
                subscriber.with(fmt_layer.json()).init();
            } else {
                subscriber.with(fmt_layer).init();
            }
            Some(guard)
        }
        _ => {
            let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stdout);
            if is_json {
                subscriber.with(fmt_layer.json()).init();
            } else {
                subscriber.with(fmt_layer).init();
            }
            None
        }
    }
}
