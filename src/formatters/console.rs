//! Console formatter for interactive and development use

use crate::core::{Formatter, LogLevel, LogRecord, LoggerError, Result, TimestampFormat};
use serde::Deserialize;

/// Default line layout
pub const DEFAULT_FORMAT: &str = "{time} [{severity}] {logger}: {message}";

/// Width the severity name is right-aligned to, so bracketed tags line up
const SEVERITY_WIDTH: usize = 8;

const RESET: &str = "\x1b[0m";

/// Whether the severity tag gets an ANSI color
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    /// Color only when the destination is a terminal
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    /// Resolve against whether the destination supports color
    pub fn resolve(self, color_capable: bool) -> bool {
        match self {
            ColorChoice::Auto => color_capable,
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Time,
    Severity,
    Logger,
    Message,
    Module,
    Function,
    Line,
}

/// Human-readable formatter: `2025-01-08 10:30:45.123 [ WARNING] svc: hello [user_id=7]`
///
/// A record carrying an exception is followed by its traceback, one entry per
/// line, ending with `<type>: <message>`.
///
/// # Example
///
/// ```
/// use rust_structured_logging::formatters::ConsoleFormatter;
///
/// let formatter = ConsoleFormatter::with_format("[{severity}] {logger} - {message}")
///     .unwrap()
///     .with_colors(true);
/// ```
#[derive(Debug, Clone)]
pub struct ConsoleFormatter {
    segments: Vec<Segment>,
    timestamp_format: TimestampFormat,
    use_colors: bool,
}

impl ConsoleFormatter {
    pub fn new() -> Self {
        Self {
            segments: parse_template(DEFAULT_FORMAT)
                .unwrap_or_else(|_| vec![Segment::Message]),
            timestamp_format: TimestampFormat::default(),
            use_colors: false,
        }
    }

    /// Use a custom line template
    ///
    /// Placeholders: `{time}`, `{severity}`, `{logger}`, `{message}`,
    /// `{module}`, `{function}`, `{line}`. `{{` and `}}` are literal braces.
    pub fn with_format(template: &str) -> Result<Self> {
        Ok(Self {
            segments: parse_template(template)?,
            ..Self::new()
        })
    }

    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    pub fn uses_colors(&self) -> bool {
        self.use_colors
    }

    fn severity_tag(&self, level: LogLevel) -> String {
        let tag = format!("{:>width$}", level, width = SEVERITY_WIDTH);
        if self.use_colors {
            format!("\x1b[{}m{}{}", level.color_code().to_fg_str(), tag, RESET)
        } else {
            tag
        }
    }

    /// Escape line breaks and tabs to prevent log injection
    fn sanitize_message(message: &str) -> String {
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }
}

impl Default for ConsoleFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter for ConsoleFormatter {
    fn format(&self, record: &LogRecord) -> Result<String> {
        let mut out = String::with_capacity(64 + record.message.len());

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Time => out.push_str(&self.timestamp_format.format(&record.timestamp)),
                Segment::Severity => out.push_str(&self.severity_tag(record.level)),
                Segment::Logger => out.push_str(&record.logger_name),
                Segment::Message => out.push_str(&Self::sanitize_message(&record.message)),
                Segment::Module => out.push_str(&record.module),
                Segment::Function => out.push_str(&record.function),
                Segment::Line => out.push_str(&record.line.to_string()),
            }
        }

        let extra = record.extra();
        if !extra.is_empty() {
            out.push_str(" [");
            out.push_str(&extra.format_fields());
            out.push(']');
        }

        if let Some(exception) = &record.exception {
            if exception.traceback.is_empty() {
                out.push('\n');
                out.push_str(&format!("{}: {}", exception.type_name, exception.message));
            }
            for entry in &exception.traceback {
                out.push('\n');
                out.push_str(entry);
            }
        }

        Ok(out)
    }

    fn name(&self) -> &str {
        "console"
    }
}

fn parse_template(template: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                literal.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                literal.push('}');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(ch) => name.push(ch),
                        None => {
                            return Err(LoggerError::config(
                                "console format",
                                format!("unclosed placeholder '{{{}' in '{}'", name, template),
                            ))
                        }
                    }
                }
                let segment = match name.as_str() {
                    "time" => Segment::Time,
                    "severity" => Segment::Severity,
                    "logger" => Segment::Logger,
                    "message" => Segment::Message,
                    "module" => Segment::Module,
                    "function" => Segment::Function,
                    "line" => Segment::Line,
                    other => {
                        return Err(LoggerError::config(
                            "console format",
                            format!("unknown placeholder '{{{}}}'", other),
                        ))
                    }
                };
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(segment);
            }
            '}' => {
                return Err(LoggerError::config(
                    "console format",
                    format!("unmatched '}}' in '{}'", template),
                ))
            }
            other => literal.push(other),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}
