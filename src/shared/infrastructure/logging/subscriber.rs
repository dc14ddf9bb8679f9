use std::fs::{self, OpenOptions};
use std::io;
use std::sync::Mutex;

use thiserror::Error;
use tracing::{Level, Subscriber};
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::shared::infrastructure::logging::line_formatter::{LineEventFormat, LineMessageFormatter};
use crate::shared::infrastructure::logging::settings::{LogSettings, LogWriter};
use crate::shared::infrastructure::logging::sinks::PROGRESS_TARGET;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("cannot open log file {path}: {source}")]
    LogFile {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("subscriber already installed: {0}")]
    AlreadyInstalled(String),
}

fn level_directive(level: Level) -> &'static str {
    match level {
        Level::ERROR => "error",
        Level::WARN => "warn",
        Level::INFO => "info",
        Level::DEBUG => "debug",
        Level::TRACE => "trace",
    }
}

/// `RUST_LOG` wins over the configured level.
pub fn env_filter(settings: &LogSettings) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_directive(settings.level)))
}

/// Terminal layer for diagnostics. Progress records are left out: the console
/// sink already prints them.
fn screen_layer<S, W>(formatter: LineMessageFormatter, writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    fmt::layer()
        .event_format(LineEventFormat::new(formatter))
        .with_writer(writer)
        .with_filter(filter_fn(|meta| meta.target() != PROGRESS_TARGET))
}

/// Installs the process-wide subscriber with one layer per configured writer.
pub fn init_subscriber(settings: &LogSettings) -> Result<(), LoggingError> {
    let formatter = LineMessageFormatter::new(settings.format.clone());

    let screen = settings
        .writers
        .contains(&LogWriter::Screen)
        .then(|| screen_layer(formatter.clone(), io::stderr));

    let file = if settings.writers.contains(&LogWriter::File) {
        let path = &settings.file_path;
        let open = || -> io::Result<fs::File> {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            OpenOptions::new().create(true).append(true).open(path)
        };
        let handle = open().map_err(|source| LoggingError::LogFile {
            path: path.display().to_string(),
            source,
        })?;
        Some(
            fmt::layer()
                .event_format(LineEventFormat::new(formatter))
                .with_ansi(false)
                .with_writer(Mutex::new(handle)),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(env_filter(settings))
        .with(screen)
        .with(file)
        .try_init()
        .map_err(|e| LoggingError::AlreadyInstalled(e.to_string()))
}

/// Routes panics through tracing before the default report runs.
pub fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_default();
        tracing::error!(%location, "panic: {info}");
        previous(info);
    }));
}
