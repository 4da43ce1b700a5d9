#![allow(dead_code)]

use serde_json::Value;
use std::error::Error;
use std::sync::{Arc, Mutex};
use tracing_log_setup::sink::LogSink;

/// Sink keeping every line in memory.
#[derive(Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    pub fn documents(&self) -> Vec<Value> {
        self.lines()
            .iter()
            .map(|line| serde_json::from_str(line).expect("structured line is valid JSON"))
            .collect()
    }
}

impl LogSink for MemorySink {
    fn write_line(&self, line: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.lines.lock().unwrap().push(line.to_string());
        Ok(())
    }
}
