use std::sync::Arc;

use thiserror::Error;

use crate::modules::archiving::core::execution_context::InvocationMode;
use crate::shared::infrastructure::logging::console_sink::{ConsoleOutput, ConsoleSink, Verbosity};
use crate::shared::infrastructure::logging::line_formatter::LineMessageFormatter;
use crate::shared::infrastructure::logging::response_stream_sink::{
    ResponseStream, ResponseStreamSink,
};
use crate::shared::infrastructure::logging::sinks::{LogSink, LogSinks, SinkKind};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SinkError {
    #[error("no {0:?} output available for this invocation")]
    OutputUnavailable(SinkKind),
}

/// Where the inbound adapter lets progress be written.
#[derive(Clone, Default)]
pub struct SinkOutputs {
    pub console: Option<ConsoleOutput>,
    pub response: Option<ResponseStream>,
}

impl SinkOutputs {
    pub fn console(output: ConsoleOutput) -> Self {
        Self {
            console: Some(output),
            response: None,
        }
    }

    pub fn response_stream(stream: ResponseStream) -> Self {
        Self {
            console: None,
            response: Some(stream),
        }
    }
}

pub fn choose_sink(mode: InvocationMode) -> SinkKind {
    match mode {
        InvocationMode::Cli => SinkKind::Console,
        InvocationMode::Http => SinkKind::ResponseStream,
    }
}

pub struct LogSinkSelector {
    formatter: LineMessageFormatter,
}

impl LogSinkSelector {
    pub fn new(formatter: LineMessageFormatter) -> Self {
        Self { formatter }
    }

    /// Adds the one sink matching `mode`. Returns `false` if it was already there.
    ///
    /// A CLI run without an explicit console falls back to stdout at verbose level.
    pub fn attach(
        &self,
        sinks: &mut LogSinks,
        mode: InvocationMode,
        outputs: &SinkOutputs,
    ) -> Result<bool, SinkError> {
        let sink: Arc<dyn LogSink> = match choose_sink(mode) {
            SinkKind::Console => {
                let output = outputs
                    .console
                    .clone()
                    .unwrap_or_else(|| ConsoleOutput::stdout(Verbosity::Verbose));
                Arc::new(ConsoleSink::new(output, self.formatter.clone()))
            }
            SinkKind::ResponseStream => {
                let stream = outputs
                    .response
                    .clone()
                    .ok_or(SinkError::OutputUnavailable(SinkKind::ResponseStream))?;
                Arc::new(ResponseStreamSink::new(stream, self.formatter.clone()))
            }
        };
        Ok(sinks.attach(sink))
    }
}
