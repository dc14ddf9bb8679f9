use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use tracing::Level;

use crate::shared::infrastructure::logging::line_formatter::LineMessageFormatter;
use crate::shared::infrastructure::logging::sinks::{LogRecord, LogSink, SinkKind};

/// Console verbosity, from `-q` up to `-vvv`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Verbose,
    VeryVerbose,
    Debug,
}

impl Verbosity {
    /// Most verbose level shown, `None` when nothing is.
    pub fn threshold(self) -> Option<Level> {
        match self {
            Verbosity::Quiet => None,
            Verbosity::Verbose => Some(Level::INFO),
            Verbosity::VeryVerbose => Some(Level::DEBUG),
            Verbosity::Debug => Some(Level::TRACE),
        }
    }

    /// Archiving output is verbose by default; each `-v` goes one step further.
    pub fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            return Verbosity::Quiet;
        }
        match verbose {
            0 => Verbosity::Verbose,
            1 => Verbosity::VeryVerbose,
            _ => Verbosity::Debug,
        }
    }
}

/// Terminal handle shared by the console sink and whoever created it.
#[derive(Clone)]
pub struct ConsoleOutput {
    verbosity: Verbosity,
    writer: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl ConsoleOutput {
    pub fn stdout(verbosity: Verbosity) -> Self {
        Self::from_writer(verbosity, io::stdout())
    }

    pub fn from_writer(verbosity: Verbosity, writer: impl Write + Send + 'static) -> Self {
        Self {
            verbosity,
            writer: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub fn write_line(&self, line: &str) {
        if let Ok(mut writer) = self.writer.lock() {
            // A closed terminal must not stop the run.
            let _ = writeln!(writer, "{line}");
            let _ = writer.flush();
        }
    }
}

pub struct ConsoleSink {
    output: ConsoleOutput,
    formatter: LineMessageFormatter,
}

impl ConsoleSink {
    pub fn new(output: ConsoleOutput, formatter: LineMessageFormatter) -> Self {
        Self { output, formatter }
    }
}

impl LogSink for ConsoleSink {
    fn kind(&self) -> SinkKind {
        SinkKind::Console
    }

    fn accepts(&self, level: Level) -> bool {
        self.output
            .verbosity()
            .threshold()
            .is_some_and(|threshold| level <= threshold)
    }

    fn write(&self, record: &LogRecord<'_>) {
        self.output.write_line(&self.formatter.format(record));
    }
}
