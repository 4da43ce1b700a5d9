use crate::env::env_var;
use crate::layer::RecordLayer;
use crate::logger::Logger;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

/// Error returned when the global `tracing` subscriber cannot be installed.
#[derive(thiserror::Error, Debug)]
pub enum InitError {
    #[error("invalid filter directives: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    #[error("a global subscriber is already installed: {0}")]
    AlreadyInstalled(#[from] TryInitError),
}

/// Route every `tracing` event in the process through `logger`.
///
/// Installs a [`Registry`] combined with [`RecordLayer`] as the global
/// default subscriber. Level filtering is left to the logger's sinks.
pub fn init_tracing(logger: Arc<Logger>) -> Result<(), InitError> {
    Registry::default()
        .with(RecordLayer::new(logger))
        .try_init()?;
    Ok(())
}

/// Like [`init_tracing`], with an [`EnvFilter`] built from `directives`
/// (e.g. `"info,hyper=warn"`) in front of the layer.
pub fn init_tracing_with_filter(logger: Arc<Logger>, directives: &str) -> Result<(), InitError> {
    let filter = EnvFilter::try_new(directives)?;
    Registry::default()
        .with(filter)
        .with(RecordLayer::new(logger))
        .try_init()?;
    Ok(())
}

/// Like [`init_tracing_with_filter`], reading directives from `RUST_LOG`
/// and falling back to `default_directives` when it is unset or empty.
///
/// An invalid `RUST_LOG` is an [`InitError::Filter`], not a fallback.
pub fn init_tracing_from_env(
    logger: Arc<Logger>,
    default_directives: &str,
) -> Result<(), InitError> {
    let directives = env_var(EnvFilter::DEFAULT_ENV);
    init_tracing_with_filter(logger, directives.as_deref().unwrap_or(default_directives))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Only failing paths here: none of them installs a global subscriber.

    #[test]
    fn invalid_rust_log_is_reported() {
        temp_env::with_var(EnvFilter::DEFAULT_ENV, Some("my_crate=notalevel"), || {
            let result = init_tracing_from_env(Arc::new(Logger::builder("env").build()), "info");
            assert!(matches!(result, Err(InitError::Filter(_))));
        });
    }

    #[test]
    fn invalid_default_is_reported_when_rust_log_is_unset() {
        temp_env::with_var_unset(EnvFilter::DEFAULT_ENV, || {
            let result =
                init_tracing_from_env(Arc::new(Logger::builder("env").build()), "other=notalevel");
            assert!(matches!(result, Err(InitError::Filter(_))));
        });
    }
}
