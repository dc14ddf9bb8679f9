// Per-run log sink collection.
//
// Purpose
// - Carry the destinations archiving progress is written to for one invocation.
//
// Responsibilities
// - Hold at most one sink per kind; attaching the same kind twice is a no-op.
// - Forward every record to `tracing` as well, so the writers configured for the
//   process (file, screen) keep receiving it.
//
// Boundaries
// - No global state. The collection is owned by the run and handed to the coordinator.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::Level;

/// Target used when progress records are forwarded to the process subscriber.
pub const PROGRESS_TARGET: &str = "cron_archive::progress";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SinkKind {
    Console,
    ResponseStream,
}

#[derive(Debug, Clone)]
pub struct LogRecord<'a> {
    pub level: Level,
    pub tag: &'a str,
    pub message: &'a str,
    pub request_id: &'a str,
    pub datetime: DateTime<Utc>,
}

pub trait LogSink: Send + Sync {
    fn kind(&self) -> SinkKind;

    /// Whether records at `level` pass this sink's threshold.
    fn accepts(&self, level: Level) -> bool;

    fn write(&self, record: &LogRecord<'_>);
}

/// Upper-case level name as rendered by `%level%`.
pub fn level_name(level: Level) -> &'static str {
    match level {
        Level::ERROR => "ERROR",
        Level::WARN => "WARNING",
        Level::INFO => "INFO",
        Level::DEBUG => "DEBUG",
        Level::TRACE => "VERBOSE",
    }
}

pub struct LogSinks {
    tag: String,
    request_id: String,
    sinks: Vec<Arc<dyn LogSink>>,
}

impl LogSinks {
    pub fn new(tag: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            request_id: request_id.into(),
            sinks: Vec::new(),
        }
    }

    /// Returns `false` when a sink of the same kind is already attached.
    pub fn attach(&mut self, sink: Arc<dyn LogSink>) -> bool {
        if self.has(sink.kind()) {
            return false;
        }
        self.sinks.push(sink);
        true
    }

    pub fn has(&self, kind: SinkKind) -> bool {
        self.sinks.iter().any(|s| s.kind() == kind)
    }

    pub fn kinds(&self) -> Vec<SinkKind> {
        self.sinks.iter().map(|s| s.kind()).collect()
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn write(&self, level: Level, message: &str) {
        self.forward(level, message);
        let record = LogRecord {
            level,
            tag: &self.tag,
            message,
            request_id: &self.request_id,
            datetime: Utc::now(),
        };
        for sink in self.sinks.iter().filter(|s| s.accepts(level)) {
            sink.write(&record);
        }
    }

    pub fn error(&self, message: &str) {
        self.write(Level::ERROR, message);
    }

    pub fn warn(&self, message: &str) {
        self.write(Level::WARN, message);
    }

    pub fn info(&self, message: &str) {
        self.write(Level::INFO, message);
    }

    pub fn debug(&self, message: &str) {
        self.write(Level::DEBUG, message);
    }

    fn forward(&self, level: Level, message: &str) {
        let request_id = self.request_id.as_str();
        match level {
            Level::ERROR => tracing::error!(target: PROGRESS_TARGET, request_id, "{message}"),
            Level::WARN => tracing::warn!(target: PROGRESS_TARGET, request_id, "{message}"),
            Level::INFO => tracing::info!(target: PROGRESS_TARGET, request_id, "{message}"),
            Level::DEBUG => tracing::debug!(target: PROGRESS_TARGET, request_id, "{message}"),
            Level::TRACE => tracing::trace!(target: PROGRESS_TARGET, request_id, "{message}"),
        }
    }
}
