//! Logging setup built on `tracing-subscriber`.
//!
//! Supports console output with optional ANSI colors and an optional
//! shared log file in full, compact, or JSON format. Both outputs are
//! driven by [`LoggerConfig`], which deserializes straight out of the
//! application settings.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Errors raised while validating or initializing the logger.
#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("Invalid log level directive: {0}")]
    InvalidLevel(String),

    #[error("Invalid log format: {0}")]
    InvalidFormat(String),

    #[error("Log file path is empty")]
    EmptyFilePath,

    #[error("At least one log output (console or file) must be enabled")]
    NoOutputEnabled,

    #[error("Failed to open log file: {0}")]
    Io(#[from] io::Error),
}

/// Output format for the log file layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Default human-readable format with full span context.
    Full,
    /// Condensed single-line format.
    Compact,
    /// Newline-delimited JSON records.
    #[default]
    Json,
}

impl FromStr for LogFormat {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "full" => Ok(LogFormat::Full),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(LoggerError::InvalidFormat(other.to_string())),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogFormat::Full => "full",
            LogFormat::Compact => "compact",
            LogFormat::Json => "json",
        };
        write!(f, "{}", s)
    }
}

/// Console output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Whether log records are written to stdout.
    pub enabled: bool,
    /// Whether ANSI colors are used on the console.
    pub colored: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            colored: true,
        }
    }
}

/// Log file settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Whether log records are written to a file.
    pub enabled: bool,
    /// Path of the log file. Parent directories are created on demand.
    pub path: String,
    /// Append to an existing file instead of truncating it.
    pub append: bool,
    /// Record format used for the file layer.
    pub format: LogFormat,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: "logs/rsvp-relay.log".to_string(),
            append: true,
            format: LogFormat::Json,
        }
    }
}

/// Top-level logger settings, embedded in the application configuration
/// under the `logger` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Filter directive, e.g. `info` or `info,hyper=warn`.
    pub level: String,
    pub console: ConsoleConfig,
    pub file: FileConfig,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            console: ConsoleConfig::default(),
            file: FileConfig::default(),
        }
    }
}

impl LoggerConfig {
    /// Checks the configuration for contradictions before any layer is built.
    pub fn validate(&self) -> Result<(), LoggerError> {
        if EnvFilter::try_new(&self.level).is_err() {
            return Err(LoggerError::InvalidLevel(self.level.clone()));
        }
        if !self.console.enabled && !self.file.enabled {
            return Err(LoggerError::NoOutputEnabled);
        }
        if self.file.enabled && self.file.path.trim().is_empty() {
            return Err(LoggerError::EmptyFilePath);
        }
        Ok(())
    }
}

/// A `MakeWriter` that hands out clones of one shared file handle, so
/// all layers and threads append to the same open file.
#[derive(Clone)]
struct SharedFileWriter {
    file: Arc<Mutex<File>>,
}

impl SharedFileWriter {
    fn open(config: &FileConfig) -> Result<Self, LoggerError> {
        let path = Path::new(&config.path);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .append(config.append)
            .truncate(!config.append)
            .write(true)
            .open(path)?;
        Ok(Self {
            file: Arc::new(Mutex::new(file)),
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, File> {
        // A thread that panicked mid-write leaves at worst a torn log
        // line, so recover the guard instead of propagating the poison.
        self.file
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Write for SharedFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.lock().flush()
    }
}

impl<'a> MakeWriter<'a> for SharedFileWriter {
    type Writer = SharedFileWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Initializes the global `tracing` subscriber from `config`.
///
/// Must be called at most once per process; a second call fails because
/// the global default subscriber is already set.
pub fn init_logger(config: &LoggerConfig) -> anyhow::Result<()> {
    config.validate()?;

    let filter = EnvFilter::try_new(&config.level)
        .map_err(|_| LoggerError::InvalidLevel(config.level.clone()))?;

    match (config.console.enabled, config.file.enabled) {
        (true, false) => {
            let console_layer = tracing_subscriber::fmt::layer()
                .with_ansi(config.console.colored)
                .with_target(true);
            tracing_subscriber::registry()
                .with(filter)
                .with(console_layer)
                .try_init()?;
        }
        (false, true) => {
            let writer = SharedFileWriter::open(&config.file)?;
            init_file_only(filter, writer, config.file.format)?;
        }
        (true, true) => {
            let writer = SharedFileWriter::open(&config.file)?;
            init_both(filter, writer, config)?;
        }
        (false, false) => return Err(LoggerError::NoOutputEnabled.into()),
    }

    Ok(())
}

fn init_file_only(
    filter: EnvFilter,
    writer: SharedFileWriter,
    format: LogFormat,
) -> anyhow::Result<()> {
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Full => {
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            registry.with(layer).try_init()?;
        }
        LogFormat::Compact => {
            let layer = tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(writer)
                .with_ansi(false);
            registry.with(layer).try_init()?;
        }
        LogFormat::Json => {
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(false)
                .with_writer(writer)
                .with_ansi(false);
            registry.with(layer).try_init()?;
        }
    }
    Ok(())
}

// The file layer is registered ahead of the console layer so the
// console's ANSI setting cannot leak escape codes into file records
// (tracing-subscriber issue 1817).
fn init_both(
    filter: EnvFilter,
    writer: SharedFileWriter,
    config: &LoggerConfig,
) -> anyhow::Result<()> {
    let registry = tracing_subscriber::registry().with(filter);
    match config.file.format {
        LogFormat::Full => {
            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            let console_layer = tracing_subscriber::fmt::layer()
                .with_ansi(config.console.colored)
                .with_target(true);
            registry.with(file_layer).with(console_layer).try_init()?;
        }
        LogFormat::Compact => {
            let file_layer = tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(writer)
                .with_ansi(false);
            let console_layer = tracing_subscriber::fmt::layer()
                .with_ansi(config.console.colored)
                .with_target(true);
            registry.with(file_layer).with(console_layer).try_init()?;
        }
        LogFormat::Json => {
            let file_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(false)
                .with_writer(writer)
                .with_ansi(false);
            let console_layer = tracing_subscriber::fmt::layer()
                .with_ansi(config.console.colored)
                .with_target(true);
            registry.with(file_layer).with(console_layer).try_init()?;
        }
    }
    Ok(())
}
