use crate::config::LoggerConfig;
use crate::logger::{Logger, LoggerError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Named loggers, each constructed at most once.
///
/// The first successful initialization for a name wins; later calls get the
/// same [`Arc<Logger>`] back and their configuration is ignored, so asking
/// for a logger twice never stacks a second set of sinks. Initialization
/// runs under the registry lock, which makes concurrent first calls for the
/// same name construct exactly once.
#[derive(Debug, Default)]
pub struct LoggerRegistry {
    loggers: Mutex<HashMap<String, Arc<Logger>>>,
}

impl LoggerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<Arc<Logger>> {
        self.lock().get(name).cloned()
    }

    /// Return the logger called `name`, building it with `init` if absent.
    ///
    /// If `init` fails nothing is registered and the next call tries again.
    pub fn get_or_try_init<F>(&self, name: &str, init: F) -> Result<Arc<Logger>, LoggerError>
    where
        F: FnOnce() -> Result<Logger, LoggerError>,
    {
        let mut loggers = self.lock();
        if let Some(logger) = loggers.get(name) {
            return Ok(Arc::clone(logger));
        }

        let logger = Arc::new(init()?);
        loggers.insert(name.to_string(), Arc::clone(&logger));
        drop(loggers);

        tracing::debug!(logger = name, "logger initialized");
        Ok(logger)
    }

    /// Return the logger called `name`, building it from `config` if absent.
    pub fn setup(&self, name: &str, config: &LoggerConfig) -> Result<Arc<Logger>, LoggerError> {
        self.get_or_try_init(name, || Logger::from_config(name, config))
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lock().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panicking `init` cannot leave a half-inserted entry behind, so a
    // poisoned map is still consistent.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<Logger>>> {
        self.loggers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noop_sink::NoopSink;
    use crate::record::Severity;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn null_logger(name: &str) -> Result<Logger, LoggerError> {
        Ok(Logger::builder(name).sink(Severity::Info, NoopSink).build())
    }

    #[test]
    fn same_name_returns_same_instance() {
        let registry = LoggerRegistry::new();
        let first = registry.get_or_try_init("api", || null_logger("api")).unwrap();
        let second = registry.get_or_try_init("api", || null_logger("api")).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
        assert!(Arc::ptr_eq(&registry.get("api").unwrap(), &first));
    }

    #[test]
    fn init_runs_once_per_name() {
        let registry = LoggerRegistry::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            registry
                .get_or_try_init("worker", || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    null_logger("worker")
                })
                .unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn concurrent_first_calls_construct_once() {
        let registry = Arc::new(LoggerRegistry::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let calls = Arc::clone(&calls);
                std::thread::spawn(move || {
                    registry
                        .get_or_try_init("shared", || {
                            calls.fetch_add(1, Ordering::SeqCst);
                            null_logger("shared")
                        })
                        .unwrap()
                })
            })
            .collect();

        let loggers: Vec<Arc<Logger>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(loggers.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }

    #[test]
    fn failed_init_registers_nothing() {
        let registry = LoggerRegistry::new();
        let result = registry.get_or_try_init("broken", || {
            Err(LoggerError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        });

        assert!(result.is_err());
        assert!(registry.is_empty());
        assert!(registry.get_or_try_init("broken", || null_logger("broken")).is_ok());
    }

    #[test]
    fn different_names_are_independent() {
        let registry = LoggerRegistry::new();
        let a = registry.get_or_try_init("b-logger", || null_logger("b-logger")).unwrap();
        let b = registry.get_or_try_init("a-logger", || null_logger("a-logger")).unwrap();

        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(registry.names(), vec!["a-logger", "b-logger"]);
    }
}
