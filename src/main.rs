use anyhow::Result;
use damage_gateway::{config, server};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Validates that a log level string is valid
fn validate_log_level(level: &str) -> Result<()> {
    level
        .parse::<tracing_subscriber::filter::LevelFilter>()
        .map_err(|_| {
            anyhow::anyhow!(
                "Invalid log level: '{}'. Valid levels: error, warn, info, debug, trace",
                level
            )
        })?;
    Ok(())
}

/// Builds the log filter from `RUST_LOG` when set, otherwise from the
/// configured level. Either source must be valid.
fn build_env_filter(rust_log: Option<&str>, config_level: &str) -> Result<EnvFilter> {
    match rust_log {
        Some(directives) => EnvFilter::try_new(directives)
            .map_err(|e| anyhow::anyhow!("Invalid RUST_LOG '{}': {}", directives, e)),
        None => {
            validate_log_level(config_level)?;
            Ok(EnvFilter::new(config_level))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (before logging setup)
    let config = match config::load().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Determine log filter: environment variable overrides config
    let rust_log = std::env::var("RUST_LOG").ok();
    let env_filter = match build_env_filter(rust_log.as_deref(), &config.server.logs.level) {
        Ok(filter) => filter,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .json()
        .init();

    info!(
        "Starting damage estimation gateway v{}",
        env!("CARGO_PKG_VERSION")
    );
    info!("Configuration loaded successfully");

    server::run(config).await?;

    Ok(())
}
