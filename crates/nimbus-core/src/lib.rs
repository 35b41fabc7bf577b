pub mod config;

pub use config::{Config, DisplayConfig, ProviderConfig, StorageConfig, TemperatureUnit};

use anyhow::Result;

/// Initialize the core application
pub fn init() -> Result<()> {
    // Initialize tracing/logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    tracing::debug!("Nimbus core initialized");
    Ok(())
}
