use crate::sink::LogSink;
use std::error::Error;

/// A sink that simply drops all lines.
///
/// Useful for measuring the cost of sanitizing and formatting without any
/// I/O, and for tests that only care about what reaches other sinks.
#[derive(Clone, Debug, Default)]
pub struct NoopSink;

impl LogSink for NoopSink {
    fn write_line(&self, _line: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }
}
