//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `ARCHETYPE_ENGINE` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use archetype_engine::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {:?}", config.server.socket_addr());
//! ```

mod ai;
mod error;
mod resolution;
mod server;

pub use ai::AiConfig;
pub use error::{ConfigError, ValidationError};
pub use resolution::ResolutionConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

use crate::application::resolution::ResolutionSettings;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables
/// and an optional `archetype-engine.toml` (useful for the fallback keyword table).
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Text-generation relay configuration
    #[serde(default)]
    pub ai: AiConfig,

    /// Resolver deadlines and fallback rules
    #[serde(default)]
    pub resolution: ResolutionConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads `archetype-engine.toml` if present
    /// 3. Reads environment variables with `ARCHETYPE_ENGINE` prefix, which win
    /// 4. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `ARCHETYPE_ENGINE__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `ARCHETYPE_ENGINE__AI__API_KEY=...` -> `ai.api_key = ...`
    /// - `ARCHETYPE_ENGINE__RESOLUTION__RETRY_DELAY_MS=1500`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name("archetype-engine").required(false))
            .add_source(
                config::Environment::default()
                    .prefix("ARCHETYPE_ENGINE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;
        self.resolution.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }

    /// Resolver settings assembled from the `ai` and `resolution` sections.
    pub fn resolution_settings(&self) -> ResolutionSettings {
        self.resolution.settings(self.ai.temperature, self.ai.max_tokens)
    }
}
