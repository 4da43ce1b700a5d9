use serde_json::json;
use tracing_log_setup::{LoggerConfig, LoggerRegistry, Severity};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let registry = LoggerRegistry::new();

    // Console at INFO, `logs/basic_example.log` at DEBUG.
    let logger = registry.setup("basic_example", &LoggerConfig::default())?;
    logger.info("This is an info message", None);
    logger.warning("This is a warning message", None);
    logger.debug("This is a debug message (file only)", None);

    let quiet = registry.setup(
        "level_example",
        &LoggerConfig {
            console_level: Severity::Warning,
            ..LoggerConfig::default()
        },
    )?;
    quiet.info("Info message (file only)", None);
    quiet.error(
        "Error message (console and file)",
        json!({"message": "kept as log_message", "attempt": 3}),
    );

    // Same name, same logger: no duplicated output.
    let again = registry.setup("basic_example", &LoggerConfig::default())?;
    again.info("Still one line per call", None);

    Ok(())
}
