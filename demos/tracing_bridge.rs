use tracing::{error, info};
use tracing_log_setup::init::init_tracing_from_env;
use tracing_log_setup::{LoggerConfig, LoggerRegistry};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = LoggerConfig {
        use_structured_format: true,
        ..LoggerConfig::from_env()?
    };
    let logger = LoggerRegistry::new().setup("tracing_bridge", &config)?;
    init_tracing_from_env(logger, "info")?;

    info!("starting service");

    error!(
        user_id = 42,
        asctime = "client supplied",
        reason = "invalid password",
        "authentication failed"
    );

    Ok(())
}
