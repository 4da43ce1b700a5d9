use crate::config::{ConfigError, ConsoleStream, LoggerConfig};
use crate::fields::{sanitize_extra, Extra, Fields};
use crate::format::{LogFormat, RecordFormatter};
use crate::record::{LogRecord, ServiceContext, Severity};
use crate::sink::{rolling_file, LogSink, WriterSink};
use chrono::Utc;
use std::error::Error;
use std::fmt::{self, Write as _};
use std::panic::Location;

/// Error returned when a logger cannot be constructed.
#[derive(thiserror::Error, Debug)]
pub enum LoggerError {
    #[error("failed to prepare log directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to open log file: {0}")]
    Appender(#[from] tracing_appender::rolling::InitError),

    #[error("invalid logger configuration: {0}")]
    Config(#[from] ConfigError),
}

struct LevelSink {
    level: Severity,
    sink: Box<dyn LogSink>,
}

/// A named logger: one formatter, one service context and any number of
/// sinks, each with its own minimum severity.
///
/// Every log call runs to completion on the calling thread: extra fields
/// are sanitized, the record is built and formatted once, then written to
/// each sink whose level admits it. Nothing here panics or returns an
/// error to the caller; sink failures are reported on stderr.
pub struct Logger {
    name: String,
    context: ServiceContext,
    formatter: Box<dyn RecordFormatter>,
    sinks: Vec<LevelSink>,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("context", &self.context)
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

impl Logger {
    pub fn builder(name: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder {
            name: name.into(),
            format: LogFormat::default(),
            formatter: None,
            context: None,
            sinks: Vec::new(),
        }
    }

    /// Build a logger with a console sink and a rotating file sink as
    /// described by `config`.
    ///
    /// **Errors**
    /// - [`LoggerError::Io`] if the log directory cannot be created.
    /// - [`LoggerError::Appender`] if the log file cannot be opened.
    pub fn from_config(name: &str, config: &LoggerConfig) -> Result<Self, LoggerError> {
        let context = ServiceContext::resolve(
            name,
            config.service_name.as_deref(),
            config.environment.as_deref(),
            config.service_version.as_deref(),
        );
        let mut builder = Logger::builder(name)
            .format(config.format())
            .service_context(context);

        if config.enable_console {
            builder = match config.console_stream {
                ConsoleStream::Stdout => builder.sink(config.console_level, WriterSink::stdout()),
                ConsoleStream::Stderr => builder.sink(config.console_level, WriterSink::stderr()),
            };
        }
        if config.enable_file {
            let path = config.file_path_for(name);
            let file = rolling_file(&path, config.rotation, config.max_log_files)?;
            builder = builder.sink(config.file_level, file);
        }

        Ok(builder.build())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn context(&self) -> &ServiceContext {
        &self.context
    }

    /// Lowest severity any sink accepts, `None` if the logger has no sinks.
    pub fn level(&self) -> Option<Severity> {
        self.sinks.iter().map(|s| s.level).min()
    }

    pub fn enabled(&self, severity: Severity) -> bool {
        self.sinks.iter().any(|s| severity >= s.level)
    }

    #[track_caller]
    pub fn log(&self, severity: Severity, message: impl fmt::Display, extra: impl Into<Extra>) {
        self.log_at(severity, message, None, extra.into(), Location::caller());
    }

    #[track_caller]
    pub fn trace(&self, message: impl fmt::Display, extra: impl Into<Extra>) {
        self.log_at(Severity::Trace, message, None, extra.into(), Location::caller());
    }

    #[track_caller]
    pub fn debug(&self, message: impl fmt::Display, extra: impl Into<Extra>) {
        self.log_at(Severity::Debug, message, None, extra.into(), Location::caller());
    }

    #[track_caller]
    pub fn info(&self, message: impl fmt::Display, extra: impl Into<Extra>) {
        self.log_at(Severity::Info, message, None, extra.into(), Location::caller());
    }

    #[track_caller]
    pub fn warning(&self, message: impl fmt::Display, extra: impl Into<Extra>) {
        self.log_at(Severity::Warning, message, None, extra.into(), Location::caller());
    }

    #[track_caller]
    pub fn error(&self, message: impl fmt::Display, extra: impl Into<Extra>) {
        self.log_at(Severity::Error, message, None, extra.into(), Location::caller());
    }

    #[track_caller]
    pub fn critical(&self, message: impl fmt::Display, extra: impl Into<Extra>) {
        self.log_at(Severity::Critical, message, None, extra.into(), Location::caller());
    }

    /// Log at [`Severity::Error`] with `error` and its `source()` chain
    /// appended to the message body.
    #[track_caller]
    pub fn exception(
        &self,
        message: impl fmt::Display,
        error: &(dyn Error + 'static),
        extra: impl Into<Extra>,
    ) {
        self.log_at(
            Severity::Error,
            message,
            Some(error),
            extra.into(),
            Location::caller(),
        );
    }

    fn log_at(
        &self,
        severity: Severity,
        message: impl fmt::Display,
        error: Option<&(dyn Error + 'static)>,
        extra: Extra,
        location: &'static Location<'static>,
    ) {
        if !self.enabled(severity) {
            return;
        }

        let attributes = sanitize_extra(extra.as_value()).unwrap_or_else(|e| {
            eprintln!("logger {}: dropping extra fields: {}", self.name, e);
            Fields::new()
        });

        let record = LogRecord {
            timestamp: Utc::now(),
            severity,
            logger: self.name.clone(),
            module_path: None,
            file: Some(location.file().to_string()),
            line: Some(location.line()),
            message: message.to_string(),
            error: error.map(render_error_chain),
            attributes,
        };
        self.emit(&record);
    }

    /// Format `record` once and write it to every sink whose level admits
    /// it. The record's attributes are expected to be sanitized already.
    pub fn emit(&self, record: &LogRecord) {
        let mut line: Option<String> = None;
        for target in &self.sinks {
            if record.severity < target.level {
                continue;
            }
            let line = line.get_or_insert_with(|| self.formatter.format(record, &self.context));
            if let Err(e) = target.sink.write_line(line) {
                eprintln!("logger {}: sink write failed: {}", self.name, e);
            }
        }
    }

    pub fn flush(&self) {
        for target in &self.sinks {
            if let Err(e) = target.sink.flush() {
                eprintln!("logger {}: sink flush failed: {}", self.name, e);
            }
        }
    }
}

fn render_error_chain(error: &(dyn Error + 'static)) -> String {
    let mut out = format!("Error: {error}");
    let mut source = error.source();
    while let Some(cause) = source {
        let _ = write!(out, "\nCaused by: {cause}");
        source = cause.source();
    }
    out
}

/// Builder returned by [`Logger::builder`].
pub struct LoggerBuilder {
    name: String,
    format: LogFormat,
    formatter: Option<Box<dyn RecordFormatter>>,
    context: Option<ServiceContext>,
    sinks: Vec<LevelSink>,
}

impl LoggerBuilder {
    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Use a custom formatter instead of one of the [`LogFormat`]s.
    pub fn formatter(mut self, formatter: impl RecordFormatter + 'static) -> Self {
        self.formatter = Some(Box::new(formatter));
        self
    }

    /// Defaults to [`ServiceContext::resolve`] with no explicit values.
    pub fn service_context(mut self, context: ServiceContext) -> Self {
        self.context = Some(context);
        self
    }

    pub fn sink(self, level: Severity, sink: impl LogSink + 'static) -> Self {
        self.boxed_sink(level, Box::new(sink))
    }

    pub fn boxed_sink(mut self, level: Severity, sink: Box<dyn LogSink>) -> Self {
        self.sinks.push(LevelSink { level, sink });
        self
    }

    pub fn build(self) -> Logger {
        let context = self
            .context
            .unwrap_or_else(|| ServiceContext::resolve(&self.name, None, None, None));
        Logger {
            formatter: self.formatter.unwrap_or_else(|| self.format.formatter()),
            name: self.name,
            context,
            sinks: self.sinks,
        }
    }
}
