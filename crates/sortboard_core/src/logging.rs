//! Logging bootstrap for board hosts (CLI, Flutter bridge).
//!
//! # Responsibility
//! - Route `log` records from every board in the process to one rolling file
//!   named after the host surface.
//! - Record panics with the host name so a crash can be matched to its surface.
//!
//! # Invariants
//! - The first successful init configures the backend for the process.
//! - Repeat init with the same directory is accepted; other directories are
//!   refused.
//! - Init never panics.

use crate::config::BoardConfig;
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::any::Any;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Environment variable naming the log directory; logging stays off when unset.
pub const LOG_DIR_ENV: &str = "SORTBOARD_LOG_DIR";
/// Environment variable overriding the build-mode default level.
pub const LOG_LEVEL_ENV: &str = "SORTBOARD_LOG_LEVEL";

const LOG_BASENAME: &str = "sortboard";
const ROTATE_AT_BYTES: u64 = 2 * 1024 * 1024;
const KEEP_LOG_FILES: usize = 3;
const PANIC_PAYLOAD_LIMIT: usize = 120;

static ACTIVE: OnceCell<ActiveLogging> = OnceCell::new();

struct ActiveLogging {
    target: LogTarget,
    _handle: LoggerHandle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Parses `trace|debug|info|warn|error` (case-insensitive, `warning` accepted).
    pub fn parse(value: &str) -> Result<Self, LoggingError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(LoggingError::UnsupportedLevel(value.trim().to_string())),
        }
    }

    /// `debug` in debug builds, `info` in release builds.
    pub fn for_build() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Info
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Logging bootstrap errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoggingError {
    UnsupportedLevel(String),
    EmptyDir,
    RelativeDir(String),
    DirConflict { active: PathBuf, requested: PathBuf },
    Backend(String),
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedLevel(value) => write!(
                f,
                "unsupported log level `{value}`; expected trace|debug|info|warn|error"
            ),
            Self::EmptyDir => write!(f, "log directory cannot be empty"),
            Self::RelativeDir(value) => {
                write!(f, "log directory must be an absolute path, got `{value}`")
            }
            Self::DirConflict { active, requested } => write!(
                f,
                "logging already writes to `{}`; refusing to switch to `{}`",
                active.display(),
                requested.display()
            ),
            Self::Backend(message) => write!(f, "log backend failed: {message}"),
        }
    }
}

impl Error for LoggingError {}

/// Where and how one host surface writes its log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogTarget {
    /// Host surface name; becomes part of the log file name.
    pub host: &'static str,
    pub level: LogLevel,
    pub dir: PathBuf,
}

impl LogTarget {
    /// Validates a level and an absolute directory for `host`.
    pub fn new(host: &'static str, level: &str, dir: &str) -> Result<Self, LoggingError> {
        let level = LogLevel::parse(level)?;
        let trimmed = dir.trim();
        if trimmed.is_empty() {
            return Err(LoggingError::EmptyDir);
        }
        if !Path::new(trimmed).is_absolute() {
            return Err(LoggingError::RelativeDir(trimmed.to_string()));
        }
        Ok(Self {
            host,
            level,
            dir: PathBuf::from(trimmed),
        })
    }

    /// Reads `SORTBOARD_LOG_DIR` / `SORTBOARD_LOG_LEVEL`.
    ///
    /// Returns `Ok(None)` when no directory is configured.
    pub fn from_env(host: &'static str) -> Result<Option<Self>, LoggingError> {
        let dir = std::env::var(LOG_DIR_ENV).unwrap_or_default();
        if dir.trim().is_empty() {
            return Ok(None);
        }
        let level = std::env::var(LOG_LEVEL_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| LogLevel::for_build().as_str().to_string());
        Self::new(host, &level, &dir).map(Some)
    }
}

/// Starts file logging for the process.
///
/// `config` is recorded in the ready line so every log file states the
/// reversal delay its boards ran with.
///
/// # Errors
/// - `DirConflict` when logging already writes to a different directory.
/// - `Backend` when the directory cannot be created or the logger fails.
pub fn init_logging(target: LogTarget, config: &BoardConfig) -> Result<(), LoggingError> {
    let active = ACTIVE.get_or_try_init(|| start(target.clone(), config))?;
    if active.target.dir != target.dir {
        return Err(LoggingError::DirConflict {
            active: active.target.dir.clone(),
            requested: target.dir,
        });
    }
    Ok(())
}

fn start(target: LogTarget, config: &BoardConfig) -> Result<ActiveLogging, LoggingError> {
    std::fs::create_dir_all(&target.dir).map_err(|err| {
        LoggingError::Backend(format!("cannot create `{}`: {err}", target.dir.display()))
    })?;

    let handle = Logger::try_with_str(target.level.as_str())
        .map_err(|err| LoggingError::Backend(err.to_string()))?
        .log_to_file(
            FileSpec::default()
                .directory(target.dir.clone())
                .basename(LOG_BASENAME)
                .discriminant(target.host),
        )
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEEP_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| LoggingError::Backend(err.to_string()))?;

    install_panic_hook(target.host);
    info!(
        "event=logging_ready module=logging status=ok host={} level={} revert_delay_ms={} version={}",
        target.host,
        target.level.as_str(),
        config.revert_delay_ms,
        env!("CARGO_PKG_VERSION")
    );

    Ok(ActiveLogging {
        target,
        _handle: handle,
    })
}

fn install_panic_hook(host: &'static str) {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        error!(
            "event=panic_captured module=logging status=error host={host} location={location} payload={}",
            one_line(panic_text(info.payload()), PANIC_PAYLOAD_LIMIT)
        );
        log::logger().flush();
        previous(info);
    }));
}

fn panic_text(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("<non-string payload>")
}

/// Collapses whitespace and caps length so one panic stays on one log line.
fn one_line(text: &str, limit: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    match flat.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &flat[..cut]),
        None => flat,
    }
}
