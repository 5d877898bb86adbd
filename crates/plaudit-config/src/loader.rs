//! Configuration loader with layered sources.

use crate::AppConfig;
use config::{Config, ConfigError, Environment, File};
use plaudit_core::PlauditError;
use std::path::Path;
use tracing::{debug, info, warn};
use url::Url;

/// Configuration loaded once at startup from layered sources.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: AppConfig,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `config/default.toml` - Default values
    /// 2. `config/{environment}.toml` - Environment-specific overrides
    /// 3. `config/local.toml` - Uncommitted local overrides
    /// 4. Environment variables with `PLAUDIT_` prefix (`__` between sections)
    pub fn new(config_dir: impl Into<String>) -> Result<Self, PlauditError> {
        let config_dir: String = config_dir.into();
        let config = Self::load_config(&config_dir)?;
        Ok(Self { config })
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> Result<Self, PlauditError> {
        Self::new("./config")
    }

    /// Returns the loaded configuration.
    pub fn get(&self) -> &AppConfig {
        &self.config
    }

    /// Loads configuration from the specified directory.
    fn load_config(config_dir: &str) -> Result<AppConfig, PlauditError> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let environment =
            std::env::var("PLAUDIT_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        info!("Loading configuration for environment: {}", environment);

        let mut builder = Config::builder();

        for name in ["default", environment.as_str(), "local"] {
            let path = format!("{}/{}.toml", config_dir, name);
            if Path::new(&path).exists() {
                debug!("Loading config from: {}", path);
                builder = builder.add_source(File::with_name(&path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("PLAUDIT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_error_to_plaudit_error)?;

        let app_config: AppConfig = config
            .try_deserialize()
            .map_err(config_error_to_plaudit_error)?;

        validate_config(&app_config)?;

        Ok(app_config)
    }
}

/// Validates the configuration, failing fast on values the core cannot run with.
pub fn validate_config(config: &AppConfig) -> Result<(), PlauditError> {
    if config.database.url.is_empty() {
        return Err(PlauditError::Configuration("Database URL is required".to_string()));
    }

    if !config.database.is_memory() {
        Url::parse(&config.database.url).map_err(|e| {
            PlauditError::Configuration(format!("Invalid database URL: {}", e))
        })?;
    }

    if config.database.min_connections > config.database.max_connections {
        return Err(PlauditError::Configuration(format!(
            "Invalid pool size: min ({}) cannot be greater than max ({})",
            config.database.min_connections, config.database.max_connections
        )));
    }

    if config.redis.enabled {
        Url::parse(&config.redis.url)
            .map_err(|e| PlauditError::Configuration(format!("Invalid Redis URL: {}", e)))?;
    } else if config.app.environment == "production" {
        warn!("Redis cache is disabled in production; every read will hit the store");
    }

    if config.cache.read_ttl_secs == 0 {
        return Err(PlauditError::Configuration(
            "cache.read_ttl_secs must be positive".to_string(),
        ));
    }

    if config.cache.write_ttl_secs == Some(0) {
        return Err(PlauditError::Configuration(
            "cache.write_ttl_secs must be positive when set".to_string(),
        ));
    }

    if config.rate_limit.enabled && config.rate_limit.requests_per_minute == 0 {
        return Err(PlauditError::Configuration(
            "rate_limit.requests_per_minute must be positive".to_string(),
        ));
    }

    Ok(())
}

fn config_error_to_plaudit_error(err: ConfigError) -> PlauditError {
    PlauditError::Configuration(err.to_string())
}
