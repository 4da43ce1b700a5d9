use serde_json::json;
use tracing_log_setup::{LoggerConfig, LoggerRegistry};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let registry = LoggerRegistry::new();
    let logger = registry.setup(
        "otlp_example",
        &LoggerConfig {
            log_file_path: Some("logs/otlp_example.log".into()),
            use_structured_format: true,
            service_name: Some("example-service".into()),
            environment: Some("development".into()),
            service_version: Some("1.0.0".into()),
            ..LoggerConfig::default()
        },
    )?;

    logger.info(
        "User action performed",
        json!({"user_id": "12345", "action": "login", "ip_address": "192.168.1.1"}),
    );

    logger.info(
        "Order processed successfully",
        json!({
            "order_id": "ORD-12345",
            "amount": 99.99,
            "currency": "USD",
            "shipping_address": {"street": "123 Main St", "city": "Anytown"}
        }),
    );

    if let Err(e) = std::fs::read_to_string("nonexistent_file.txt") {
        logger.exception(
            "File not found error",
            &e,
            json!({"file_path": "nonexistent_file.txt", "operation": "file_read"}),
        );
    }

    Ok(())
}
