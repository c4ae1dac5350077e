//! File-based diagnostic log
//!
//! A process-global log file for troubleshooting resolution failures when
//! stderr is swallowed by the embedding host (a Python process loading the
//! extension module, for instance).
//!
//! Controlled by two environment variables, read once on first use:
//! - `COREHEY_DEBUG`: `1`/`true` enables the log (default), anything else disables it
//! - `COREHEY_LOG_LEVEL`: `trace`, `debug`, `info`, `warn` or `error` (default `debug`)

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::SystemTime;

use once_cell::sync::Lazy;

/// Log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl LogLevel {
    /// Parse a level name, case-insensitively
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "TRACE"),
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO "),
            LogLevel::Warn => write!(f, "WARN "),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

struct FileLoggerState {
    file: Option<File>,
    /// `None` when disabled through `COREHEY_DEBUG`
    threshold: Option<LogLevel>,
    pid: u32,
}

impl FileLoggerState {
    fn from_env() -> Self {
        let enabled = std::env::var("COREHEY_DEBUG")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(true);
        let threshold = enabled.then(|| {
            std::env::var("COREHEY_LOG_LEVEL")
                .ok()
                .and_then(|v| LogLevel::parse(&v))
                .unwrap_or(LogLevel::Debug)
        });

        // Only touch the filesystem when something will be written
        let file = threshold.and_then(|_| open_append(&log_file_path()));

        Self {
            file,
            threshold,
            pid: std::process::id(),
        }
    }

    fn accepts(&self, level: LogLevel) -> bool {
        self.threshold.is_some_and(|min| level >= min)
    }

    fn write(&mut self, level: LogLevel, module: &str, message: &str) {
        if !self.accepts(level) {
            return;
        }
        let pid = self.pid;
        let Some(file) = self.file.as_mut() else {
            return;
        };
        let _ = writeln!(file, "[{}] [{}] [{}] [{}] {}", clock(), pid, level, module, message);
        let _ = file.flush();
    }
}

fn open_append(path: &Path) -> Option<File> {
    OpenOptions::new().create(true).append(true).open(path).ok()
}

/// UTC wall clock as `HH:MM:SS.mmm`
fn clock() -> String {
    match SystemTime::now().duration_since(SystemTime::UNIX_EPOCH) {
        Ok(d) => {
            let secs = d.as_secs() % 86_400;
            format!(
                "{:02}:{:02}:{:02}.{:03}",
                secs / 3600,
                (secs % 3600) / 60,
                secs % 60,
                d.subsec_millis()
            )
        }
        Err(_) => "--:--:--.---".to_string(),
    }
}

static STATE: Lazy<Mutex<FileLoggerState>> = Lazy::new(|| Mutex::new(FileLoggerState::from_env()));

/// Append one line to the diagnostic log, if enabled for `level`
pub fn log(level: LogLevel, module: &str, message: &str) {
    if let Ok(mut state) = STATE.lock() {
        state.write(level, module, message);
    }
}

pub fn trace(module: &str, message: &str) {
    log(LogLevel::Trace, module, message);
}

pub fn debug(module: &str, message: &str) {
    log(LogLevel::Debug, module, message);
}

pub fn info(module: &str, message: &str) {
    log(LogLevel::Info, module, message);
}

pub fn warn(module: &str, message: &str) {
    log(LogLevel::Warn, module, message);
}

pub fn error(module: &str, message: &str) {
    log(LogLevel::Error, module, message);
}

/// `{temp_dir}/corehey-debug.log`
pub fn log_file_path() -> PathBuf {
    std::env::temp_dir().join("corehey-debug.log")
}
