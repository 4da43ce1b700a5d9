//! Masking of sensitive environment variables before they are shown or
//! logged.
//!
//! Whether a variable is masked depends only on its name, so masking an
//! already-masked snapshot changes nothing.

use crate::dotenv::{read_dotenv, DotenvError, EnvSnapshot};
use crate::logger::Logger;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::Path;

/// Substrings that mark a variable name as sensitive by default.
pub const DEFAULT_SENSITIVE_PATTERNS: &[&str] = &["KEY", "SECRET", "PASSWORD", "TOKEN", "CREDENTIAL"];

/// Replacement for sensitive values by default.
pub const DEFAULT_MASK: &str = "********";

/// Which variables to mask and what to replace their values with.
///
/// A name is sensitive if it contains any of `patterns`, compared
/// case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskingPolicy {
    pub patterns: Vec<String>,
    pub marker: String,
}

impl Default for MaskingPolicy {
    fn default() -> Self {
        Self {
            patterns: DEFAULT_SENSITIVE_PATTERNS.iter().map(|p| p.to_string()).collect(),
            marker: DEFAULT_MASK.to_string(),
        }
    }
}

impl MaskingPolicy {
    pub fn new<I, S>(patterns: I, marker: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
            marker: marker.into(),
        }
    }

    pub fn is_sensitive(&self, name: &str) -> bool {
        let name = name.to_uppercase();
        self.patterns
            .iter()
            .any(|pattern| !pattern.is_empty() && name.contains(&pattern.to_uppercase()))
    }

    pub fn mask_value<'a>(&'a self, name: &str, value: &'a str) -> &'a str {
        if self.is_sensitive(name) {
            &self.marker
        } else {
            value
        }
    }

    /// Build a snapshot of `vars` with sensitive values replaced.
    pub fn mask_vars<I, K, V>(&self, vars: I) -> EnvSnapshot
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        vars.into_iter()
            .map(|(name, value)| {
                let name = name.into();
                let value = self.mask_value(&name, value.as_ref()).to_string();
                (name, value)
            })
            .collect()
    }
}

/// Copy of the current process environment. Names or values that are not
/// valid UTF-8 are converted lossily.
pub fn env_snapshot() -> EnvSnapshot {
    std::env::vars_os()
        .map(|(name, value)| {
            (
                name.to_string_lossy().into_owned(),
                value.to_string_lossy().into_owned(),
            )
        })
        .collect()
}

pub fn get_env_vars_with_masking(policy: &MaskingPolicy) -> EnvSnapshot {
    policy.mask_vars(env_snapshot())
}

/// Masked variables of an env file; empty if the file does not exist.
pub fn get_dotenv_vars_with_masking(
    path: impl AsRef<Path>,
    policy: &MaskingPolicy,
) -> Result<EnvSnapshot, DotenvError> {
    Ok(policy.mask_vars(read_dotenv(path)?))
}

/// Log the masked process environment through `logger`, one `INFO` record
/// per variable. Returns the number of variables logged.
pub fn log_env_vars_with_masking(logger: &Logger, policy: &MaskingPolicy) -> usize {
    let vars = get_env_vars_with_masking(policy);
    log_snapshot(logger, "process environment", &vars);
    vars.len()
}

/// Log the masked contents of an env file through `logger`. A missing file
/// logs a single notice and returns `Ok(0)`.
pub fn log_dotenv_vars_with_masking(
    logger: &Logger,
    path: impl AsRef<Path>,
    policy: &MaskingPolicy,
) -> Result<usize, DotenvError> {
    let path = path.as_ref();
    if !path.exists() {
        logger.info(
            format_args!("no env file found at {}", path.display()),
            json!({"path": path.display().to_string()}),
        );
        return Ok(0);
    }

    let vars = get_dotenv_vars_with_masking(path, policy)?;
    log_snapshot(logger, &path.display().to_string(), &vars);
    Ok(vars.len())
}

fn log_snapshot(logger: &Logger, source: &str, vars: &EnvSnapshot) {
    logger.info(
        format_args!("{} variables from {}", vars.len(), source),
        json!({"source": source, "count": vars.len()}),
    );
    for (name, value) in vars {
        logger.info(format_args!("{name}={value}"), json!({"variable": name}));
    }
}
