use crate::env::{env_or, ENVIRONMENT_ENV, SERVICE_NAME_ENV, SERVICE_VERSION_ENV};
use crate::fields::Fields;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a [`LogRecord`], ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Severity {
    Trace,
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    /// Upper-case name used as `severityText` and in `[LEVEL]` of text lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a [`Severity`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid log level: {0}")]
pub struct ParseSeverityError(pub String);

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Severity::Trace),
            "debug" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            "warn" | "warning" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            "critical" | "fatal" => Ok(Severity::Critical),
            _ => Err(ParseSeverityError(s.to_string())),
        }
    }
}

impl TryFrom<String> for Severity {
    type Error = ParseSeverityError;

    fn try_from(s: String) -> Result<Self, ParseSeverityError> {
        s.parse()
    }
}

impl From<Severity> for String {
    fn from(severity: Severity) -> Self {
        severity.as_str().to_string()
    }
}

impl From<tracing::Level> for Severity {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => Severity::Trace,
            tracing::Level::DEBUG => Severity::Debug,
            tracing::Level::INFO => Severity::Info,
            tracing::Level::WARN => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

/// One emission of a logger, already carrying sanitized attributes.
#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub severity: Severity,
    /// Logger name, or the event target when the record came from `tracing`.
    pub logger: String,
    pub module_path: Option<String>,
    pub file: Option<String>,
    pub line: Option<u32>,
    pub message: String,
    /// Rendered `source()` chain of an error passed to [`Logger::exception`].
    ///
    /// [`Logger::exception`]: crate::logger::Logger::exception
    pub error: Option<String>,
    pub attributes: Fields,
}

impl LogRecord {
    /// Message text with the error chain, if any, appended on its own line.
    pub fn body(&self) -> String {
        match &self.error {
            Some(error) => format!("{}\n{}", self.message, error),
            None => self.message.clone(),
        }
    }
}

/// Static metadata attached to every record of a logger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceContext {
    #[serde(rename = "service.name")]
    pub service_name: String,
    #[serde(rename = "deployment.environment")]
    pub environment: String,
    #[serde(rename = "service.version")]
    pub service_version: String,
}

impl ServiceContext {
    pub fn new(
        service_name: impl Into<String>,
        environment: impl Into<String>,
        service_version: impl Into<String>,
    ) -> Self {
        Self {
            service_name: service_name.into(),
            environment: environment.into(),
            service_version: service_version.into(),
        }
    }

    /// Resolve a context for `logger_name`.
    ///
    /// Explicit values win, then `SERVICE_NAME` / `ENVIRONMENT` /
    /// `SERVICE_VERSION`, then the logger name, `development` and `unknown`.
    pub fn resolve(
        logger_name: &str,
        service_name: Option<&str>,
        environment: Option<&str>,
        service_version: Option<&str>,
    ) -> Self {
        let pick = |explicit: Option<&str>, key: &str, fallback: &str| {
            explicit
                .map(str::to_string)
                .unwrap_or_else(|| env_or(key, fallback))
        };

        Self {
            service_name: pick(service_name, SERVICE_NAME_ENV, logger_name),
            environment: pick(environment, ENVIRONMENT_ENV, "development"),
            service_version: pick(service_version, SERVICE_VERSION_ENV, "unknown"),
        }
    }
}
