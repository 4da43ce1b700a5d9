//! Environment variable names recognised when configuring loggers.
//!
//! These are purely helpers; [`Logger`](crate::logger::Logger) itself never
//! reads the environment, only [`LoggerConfig::from_env`] and
//! [`ServiceContext::resolve`] do.
//!
//! [`LoggerConfig::from_env`]: crate::config::LoggerConfig::from_env
//! [`ServiceContext::resolve`]: crate::record::ServiceContext::resolve

/// Minimum severity for both console and file output, e.g. `DEBUG`.
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

/// Path of the log file.
pub const LOG_FILE_PATH_ENV: &str = "LOG_FILE_PATH";

/// Output format: `json` / `structured` / `otlp` or `text` / `plain`.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Logical service name attached to structured records.
pub const SERVICE_NAME_ENV: &str = "SERVICE_NAME";

/// Deployment environment, e.g. `production`.
pub const ENVIRONMENT_ENV: &str = "ENVIRONMENT";

/// Service version attached to structured records.
pub const SERVICE_VERSION_ENV: &str = "SERVICE_VERSION";

/// Read an environment variable, treating unset and empty the same way.
pub fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    env_var(key).unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_value_counts_as_unset() {
        temp_env::with_var("TRACING_LOG_SETUP_TEST_EMPTY", Some(""), || {
            assert_eq!(env_var("TRACING_LOG_SETUP_TEST_EMPTY"), None);
            assert_eq!(env_or("TRACING_LOG_SETUP_TEST_EMPTY", "fallback"), "fallback");
        });
    }

    #[test]
    fn set_value_is_returned() {
        temp_env::with_var("TRACING_LOG_SETUP_TEST_SET", Some("value"), || {
            assert_eq!(env_or("TRACING_LOG_SETUP_TEST_SET", "fallback"), "value");
        });
    }
}
