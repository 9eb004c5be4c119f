use rust_decimal::Decimal;
use tracing::debug;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::{AnalyticsSettings, Config, DemoSettings, JournalSettings, OnChainSettings};

/// Loads the application configuration.
///
/// Reads the optional `config.toml` in the working directory, then applies
/// `DERIVISION_*` environment overrides (double underscore separates the
/// section from the key, e.g. `DERIVISION_ANALYTICS__STARTING_EQUITY`).
/// Every field has a default, so a missing file is not an error.
pub fn load_config() -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name("config.toml").required(false))
        .add_source(config::Environment::with_prefix("DERIVISION").separator("__"))
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    validate(&config)?;

    debug!(
        starting_equity = %config.analytics.starting_equity,
        utc_offset_minutes = config.analytics.utc_offset_minutes,
        "configuration loaded"
    );
    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.analytics.starting_equity <= Decimal::ZERO {
        return Err(ConfigError::ValidationError(format!(
            "analytics.starting_equity must be positive, got {}",
            config.analytics.starting_equity
        )));
    }
    Ok(())
}
