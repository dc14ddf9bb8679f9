use std::fmt;

use chrono::Utc;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use crate::shared::infrastructure::logging::sinks::{LogRecord, level_name};

pub const DEFAULT_LOG_FORMAT: &str = "%level% %tag%[%datetime%] %message%";

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Renders a record through a `%placeholder%` template.
///
/// Supported placeholders: `%level%`, `%tag%`, `%datetime%`, `%request_id%`
/// and `%message%`. Every line of a multi-line message gets its own prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMessageFormatter {
    format: String,
}

impl Default for LineMessageFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_FORMAT)
    }
}

impl LineMessageFormatter {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
        }
    }

    pub fn format(&self, record: &LogRecord<'_>) -> String {
        let datetime = record.datetime.format(DATETIME_FORMAT).to_string();
        let prefix = self
            .format
            .replace("%level%", level_name(record.level))
            .replace("%tag%", record.tag)
            .replace("%datetime%", &datetime)
            .replace("%request_id%", record.request_id);

        let mut lines: Vec<&str> = record.message.lines().collect();
        if lines.is_empty() {
            lines.push("");
        }
        lines
            .into_iter()
            .map(|line| prefix.replace("%message%", line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// `tracing-subscriber` event format backed by [`LineMessageFormatter`].
///
/// The tag is the last segment of the event target.
pub struct LineEventFormat {
    formatter: LineMessageFormatter,
}

impl LineEventFormat {
    pub fn new(formatter: LineMessageFormatter) -> Self {
        Self { formatter }
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
    request_id: String,
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            "request_id" => self.request_id = value.to_string(),
            _ => {}
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{value:?}"),
            "request_id" => self.request_id = format!("{value:?}"),
            _ => {}
        }
    }
}

impl<S, N> FormatEvent<S, N> for LineEventFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        let meta = event.metadata();
        let tag = meta.target().rsplit("::").next().unwrap_or_default();
        let record = LogRecord {
            level: *meta.level(),
            tag,
            message: &visitor.message,
            request_id: &visitor.request_id,
            datetime: Utc::now(),
        };
        writeln!(writer, "{}", self.formatter.format(&record))
    }
}

#[cfg(test)]
mod line_message_formatter_tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};
    use tracing::Level;

    #[fixture]
    fn record() -> LogRecord<'static> {
        LogRecord {
            level: Level::INFO,
            tag: "CronArchive",
            message: "Starting archiving",
            request_id: "req-1",
            datetime: Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap(),
        }
    }

    #[rstest]
    fn it_should_render_the_default_format(record: LogRecord<'static>) {
        let line = LineMessageFormatter::default().format(&record);
        assert_eq!(line, "INFO CronArchive[2024-03-09 14:05:07] Starting archiving");
    }

    #[rstest]
    fn it_should_prefix_every_line_of_a_multi_line_message(record: LogRecord<'static>) {
        let record = LogRecord {
            level: Level::WARN,
            message: "first\nsecond",
            ..record
        };
        let line = LineMessageFormatter::new("%level%: %message%").format(&record);
        assert_eq!(line, "WARNING: first\nWARNING: second");
    }

    #[rstest]
    fn it_should_render_the_request_id(record: LogRecord<'static>) {
        let line = LineMessageFormatter::new("[%request_id%] %message%").format(&record);
        assert_eq!(line, "[req-1] Starting archiving");
    }

    #[rstest]
    fn it_should_not_expand_placeholders_inside_the_message(record: LogRecord<'static>) {
        let record = LogRecord {
            message: "literal %level%",
            ..record
        };
        let line = LineMessageFormatter::new("%message%").format(&record);
        assert_eq!(line, "literal %level%");
    }

    #[rstest]
    fn it_should_render_an_empty_message_as_one_line(record: LogRecord<'static>) {
        let record = LogRecord {
            message: "",
            ..record
        };
        let line = LineMessageFormatter::new("%level%|%message%").format(&record);
        assert_eq!(line, "INFO|");
    }
}
