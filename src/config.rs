use crate::env::{
    env_var, ENVIRONMENT_ENV, LOG_FILE_PATH_ENV, LOG_FORMAT_ENV, LOG_LEVEL_ENV, SERVICE_NAME_ENV,
    SERVICE_VERSION_ENV,
};
use crate::format::LogFormat;
use crate::record::{ParseSeverityError, Severity};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing_appender::rolling::Rotation;

/// Configuration of a [`Logger`](crate::logger::Logger) built by
/// [`Logger::from_config`](crate::logger::Logger::from_config).
///
/// **Fields**
/// - `log_file_path`: file output location; `None` means `logs/<name>.log`.
/// - `console_level` / `file_level`: minimum severity routed to each sink.
/// - `enable_console` / `enable_file`: switch a sink off entirely.
/// - `console_stream`: whether console output goes to stdout or stderr.
/// - `use_structured_format`: JSON lines instead of plain text, for both
///   sinks.
/// - `service_name`, `environment`, `service_version`: service context of
///   structured lines; unset parts are resolved by
///   [`ServiceContext::resolve`](crate::record::ServiceContext::resolve).
/// - `rotation` / `max_log_files`: time-based rotation of the file and how
///   many files are retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub log_file_path: Option<PathBuf>,
    pub console_level: Severity,
    pub file_level: Severity,
    pub enable_console: bool,
    pub enable_file: bool,
    pub console_stream: ConsoleStream,
    pub use_structured_format: bool,
    pub service_name: Option<String>,
    pub environment: Option<String>,
    pub service_version: Option<String>,
    pub rotation: FileRotation,
    pub max_log_files: Option<usize>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            log_file_path: None,
            console_level: Severity::Info,
            file_level: Severity::Debug,
            enable_console: true,
            enable_file: true,
            console_stream: ConsoleStream::default(),
            use_structured_format: false,
            service_name: None,
            environment: None,
            service_version: None,
            rotation: FileRotation::default(),
            max_log_files: Some(7),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: {source}")]
    InvalidLevel {
        var: &'static str,
        source: ParseSeverityError,
    },

    #[error("{var}: unknown log format {value:?}")]
    InvalidFormat { var: &'static str, value: String },
}

impl LoggerConfig {
    /// Defaults overridden by `LOG_LEVEL`, `LOG_FILE_PATH`, `LOG_FORMAT`,
    /// `SERVICE_NAME`, `ENVIRONMENT` and `SERVICE_VERSION`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    /// Apply the recognised environment variables on top of `self`.
    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Some(level) = env_var(LOG_LEVEL_ENV) {
            let level = level.parse().map_err(|source| ConfigError::InvalidLevel {
                var: LOG_LEVEL_ENV,
                source,
            })?;
            self.console_level = level;
            self.file_level = level;
        }
        if let Some(path) = env_var(LOG_FILE_PATH_ENV) {
            self.log_file_path = Some(PathBuf::from(path));
        }
        if let Some(format) = env_var(LOG_FORMAT_ENV) {
            self.use_structured_format = match format.to_ascii_lowercase().as_str() {
                "json" | "structured" | "otlp" => true,
                "text" | "plain" => false,
                _ => {
                    return Err(ConfigError::InvalidFormat {
                        var: LOG_FORMAT_ENV,
                        value: format,
                    })
                }
            };
        }
        if let Some(name) = env_var(SERVICE_NAME_ENV) {
            self.service_name = Some(name);
        }
        if let Some(environment) = env_var(ENVIRONMENT_ENV) {
            self.environment = Some(environment);
        }
        if let Some(version) = env_var(SERVICE_VERSION_ENV) {
            self.service_version = Some(version);
        }
        Ok(self)
    }

    pub fn format(&self) -> LogFormat {
        if self.use_structured_format {
            LogFormat::Structured
        } else {
            LogFormat::Text
        }
    }

    /// Where the file sink writes for a logger called `name`.
    pub fn file_path_for(&self, name: &str) -> PathBuf {
        self.log_file_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("logs").join(format!("{name}.log")))
    }
}

/// Stream the console sink writes to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleStream {
    #[default]
    Stdout,
    Stderr,
}

/// Time-based rotation of the log file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileRotation {
    Minutely,
    Hourly,
    #[default]
    Daily,
    Never,
}

impl From<FileRotation> for Rotation {
    fn from(rotation: FileRotation) -> Self {
        match rotation {
            FileRotation::Minutely => Rotation::MINUTELY,
            FileRotation::Hourly => Rotation::HOURLY,
            FileRotation::Daily => Rotation::DAILY,
            FileRotation::Never => Rotation::NEVER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_VARS: [&str; 6] = [
        LOG_LEVEL_ENV,
        LOG_FILE_PATH_ENV,
        LOG_FORMAT_ENV,
        SERVICE_NAME_ENV,
        ENVIRONMENT_ENV,
        SERVICE_VERSION_ENV,
    ];

    #[test]
    fn defaults() {
        let config = LoggerConfig::default();
        assert_eq!(config.console_level, Severity::Info);
        assert_eq!(config.file_level, Severity::Debug);
        assert_eq!(config.format(), LogFormat::Text);
        assert_eq!(config.rotation, FileRotation::Daily);
        assert_eq!(config.console_stream, ConsoleStream::Stdout);
        assert_eq!(config.file_path_for("api"), PathBuf::from("logs/api.log"));
    }

    #[test]
    fn deserializes_partial_config() {
        let config: LoggerConfig = serde_json::from_str(
            r#"{"console_level": "warning", "use_structured_format": true, "rotation": "never", "console_stream": "stderr"}"#,
        )
        .unwrap();

        assert_eq!(config.console_level, Severity::Warning);
        assert_eq!(config.file_level, Severity::Debug);
        assert!(config.use_structured_format);
        assert_eq!(config.rotation, FileRotation::Never);
        assert_eq!(config.console_stream, ConsoleStream::Stderr);
    }

    #[test]
    fn rejects_unknown_level_in_config() {
        let result = serde_json::from_str::<LoggerConfig>(r#"{"file_level": "loud"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn from_env_applies_overrides() {
        temp_env::with_vars(
            [
                (LOG_LEVEL_ENV, Some("debug")),
                (LOG_FILE_PATH_ENV, Some("/tmp/custom.log")),
                (LOG_FORMAT_ENV, Some("OTLP")),
                (SERVICE_NAME_ENV, Some("env-demo-service")),
                (ENVIRONMENT_ENV, Some("demo")),
                (SERVICE_VERSION_ENV, Some("2.0.0")),
            ],
            || {
                let config = LoggerConfig::from_env().unwrap();
                assert_eq!(config.console_level, Severity::Debug);
                assert_eq!(config.file_level, Severity::Debug);
                assert_eq!(config.file_path_for("x"), PathBuf::from("/tmp/custom.log"));
                assert!(config.use_structured_format);
                assert_eq!(config.service_name.as_deref(), Some("env-demo-service"));
                assert_eq!(config.environment.as_deref(), Some("demo"));
                assert_eq!(config.service_version.as_deref(), Some("2.0.0"));
            },
        );
    }

    #[test]
    fn from_env_without_vars_is_default() {
        temp_env::with_vars_unset(ALL_VARS, || {
            assert_eq!(LoggerConfig::from_env().unwrap(), LoggerConfig::default());
        });
    }

    #[test]
    fn from_env_rejects_bad_values() {
        temp_env::with_var(LOG_LEVEL_ENV, Some("loud"), || {
            assert!(matches!(
                LoggerConfig::from_env(),
                Err(ConfigError::InvalidLevel { .. })
            ));
        });
        temp_env::with_vars(
            [(LOG_LEVEL_ENV, None), (LOG_FORMAT_ENV, Some("xml"))],
            || {
                assert!(matches!(
                    LoggerConfig::from_env(),
                    Err(ConfigError::InvalidFormat { .. })
                ));
            },
        );
    }
}
