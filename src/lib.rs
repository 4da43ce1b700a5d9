//! Loggers with console and rotating file output on top of `tracing`.
//!
//! A [`Logger`] sanitizes caller-supplied fields so they cannot overwrite
//! the names a record owns (`message` becomes `log_message`), then renders
//! each record either as a plain text line or as a structured JSON line:
//!
//! ```text
//! {"timestamp":"..","severityText":"INFO","body":"..","attributes":{..},"resource":{"service.name":..}}
//! ```
//!
//! Loggers are looked up by name through a [`LoggerRegistry`], can receive
//! ordinary `tracing` events via [`RecordLayer`], and can dump the process
//! environment or a `.env` file with sensitive values masked.

pub mod record;
pub mod fields;
pub mod format;
pub mod sink;
pub mod noop_sink;
pub mod config;
pub mod env;
pub mod logger;
pub mod registry;
pub mod layer;
pub mod init;
pub mod dotenv;
pub mod masking;

pub use config::{ConsoleStream, FileRotation, LoggerConfig};
pub use fields::{sanitize_extra, Extra, Fields};
pub use format::LogFormat;
pub use layer::RecordLayer;
pub use logger::{Logger, LoggerError};
pub use masking::MaskingPolicy;
pub use record::{LogRecord, ServiceContext, Severity};
pub use registry::LoggerRegistry;
