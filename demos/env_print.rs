use tracing_log_setup::dotenv::{load_env_file, DEFAULT_DOTENV_PATH};
use tracing_log_setup::masking::{
    get_env_vars_with_masking, log_dotenv_vars_with_masking, log_env_vars_with_masking,
};
use tracing_log_setup::{LoggerConfig, LoggerRegistry, MaskingPolicy};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if !load_env_file(DEFAULT_DOTENV_PATH)? {
        println!("no {DEFAULT_DOTENV_PATH} file, using the process environment only");
    }

    let policy = MaskingPolicy::default();
    for (name, value) in get_env_vars_with_masking(&policy).iter().take(5) {
        println!("  {name} = {value}");
    }

    let logger = LoggerRegistry::new().setup("env_print", &LoggerConfig::from_env()?)?;
    let count = log_env_vars_with_masking(&logger, &policy);
    println!("logged {count} environment variables");

    let count = log_dotenv_vars_with_masking(&logger, DEFAULT_DOTENV_PATH, &policy)?;
    println!("logged {count} variables from {DEFAULT_DOTENV_PATH}");

    Ok(())
}
