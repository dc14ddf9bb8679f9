// Log sink writing straight into an HTTP response body.
//
// Each accepted record becomes one or more newline-terminated lines pushed onto an
// unbounded channel; the HTTP adapter turns the receiving end into a streamed body.

use tokio::sync::mpsc;
use tracing::Level;

use crate::shared::infrastructure::logging::line_formatter::LineMessageFormatter;
use crate::shared::infrastructure::logging::sinks::{LogRecord, LogSink, SinkKind};

pub type ResponseStream = mpsc::UnboundedSender<String>;

/// Records below this level never reach the response body.
pub const RESPONSE_STREAM_LEVEL: Level = Level::INFO;

pub struct ResponseStreamSink {
    stream: ResponseStream,
    min_level: Level,
    formatter: LineMessageFormatter,
}

impl ResponseStreamSink {
    pub fn new(stream: ResponseStream, formatter: LineMessageFormatter) -> Self {
        Self {
            stream,
            min_level: RESPONSE_STREAM_LEVEL,
            formatter,
        }
    }
}

impl LogSink for ResponseStreamSink {
    fn kind(&self) -> SinkKind {
        SinkKind::ResponseStream
    }

    fn accepts(&self, level: Level) -> bool {
        level <= self.min_level
    }

    fn write(&self, record: &LogRecord<'_>) {
        let mut line = self.formatter.format(record);
        line.push('\n');
        // Client went away; archiving carries on.
        let _ = self.stream.send(line);
    }
}
