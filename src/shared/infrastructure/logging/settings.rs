use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::Level;

use crate::shared::infrastructure::logging::line_formatter::DEFAULT_LOG_FORMAT;

pub const DEFAULT_LOG_FILE_NAME: &str = "archive.log";
const DEFAULT_LOG_FILE_PATH: &str = "logs/archive.log";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LogSettingsError {
    #[error("unknown log writer: {0}")]
    UnknownLogWriter(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogWriter {
    File,
    Screen,
}

impl LogWriter {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "file" => Some(LogWriter::File),
            "screen" => Some(LogWriter::Screen),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub writers: Vec<LogWriter>,
    pub level: Level,
    pub file_path: PathBuf,
    pub format: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            writers: vec![LogWriter::Screen],
            level: Level::WARN,
            file_path: PathBuf::from("tmp").join(DEFAULT_LOG_FILE_PATH),
            format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

/// Maps comma separated writer names to writers, keeping first occurrences.
///
/// Unknown names are dropped unless `strict` is set.
pub fn parse_log_writers(names: &str, strict: bool) -> Result<Vec<LogWriter>, LogSettingsError> {
    let mut writers = Vec::new();
    for name in names.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        match LogWriter::from_name(name) {
            Some(writer) if !writers.contains(&writer) => writers.push(writer),
            Some(_) => {}
            None if strict => return Err(LogSettingsError::UnknownLogWriter(name.to_string())),
            None => {}
        }
    }
    Ok(writers)
}

/// Unknown or empty names fall back to `WARNING`.
pub fn resolve_log_level(name: &str) -> Level {
    match name.trim().to_uppercase().as_str() {
        "ERROR" => Level::ERROR,
        "WARN" | "WARNING" => Level::WARN,
        "INFO" => Level::INFO,
        "DEBUG" => Level::DEBUG,
        "VERBOSE" => Level::TRACE,
        _ => Level::WARN,
    }
}

pub fn resolve_log_file_path(configured: &str, tmp_dir: &Path) -> PathBuf {
    let configured = configured.trim();
    if configured.starts_with('/') {
        return PathBuf::from(configured);
    }

    let relative = configured.strip_prefix("tmp/").unwrap_or(configured);
    let relative = relative.trim_start_matches('/');
    let relative = if relative.is_empty() {
        DEFAULT_LOG_FILE_PATH
    } else {
        relative
    };

    let path = tmp_dir.join(relative);
    if path.is_dir() {
        path.join(DEFAULT_LOG_FILE_NAME)
    } else {
        path
    }
}
