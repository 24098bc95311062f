use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{
    ApiKeys, Config, ConfigOverrides, DashboardConfig, LoggingConfig, ProvidersConfig,
    ServerConfig, StorageConfig, MAX_WINDOW_DAYS,
};

/// Loads the application configuration.
///
/// Layers, lowest precedence first: built-in defaults, the TOML file at `path`
/// (optional), then `BIZPULSE_*` environment variables using `__` between
/// nesting levels (e.g. `BIZPULSE_SERVER__PORT=8080`).
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix("BIZPULSE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    validate(&config)?;

    Ok(config)
}

/// Rejects settings the rest of the system cannot work with.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError("server.port must be non-zero".to_string()));
    }
    if !(1..=MAX_WINDOW_DAYS).contains(&config.dashboard.default_window_days) {
        return Err(ConfigError::ValidationError(format!(
            "dashboard.default_window_days must be between 1 and {MAX_WINDOW_DAYS}"
        )));
    }
    if config.dashboard.lookup_debounce_ms == 0 {
        return Err(ConfigError::ValidationError(
            "dashboard.lookup_debounce_ms must be positive".to_string(),
        ));
    }
    if config.storage.storage_key.trim().is_empty() {
        return Err(ConfigError::ValidationError("storage.storage_key must not be empty".to_string()));
    }
    Ok(())
}
