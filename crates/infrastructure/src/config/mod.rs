//! Application configuration
//!
//! Sources are layered, later ones overriding earlier ones:
//! - serde defaults on every section
//! - an optional `config.toml` in the working directory (or an explicit file)
//! - `GEOCODER_`-prefixed environment variables, nested with `__`
//!   (e.g. `GEOCODER_GEOCODING__CLIENT_ID`)

use std::path::{Path, PathBuf};

use integration_geocoding::GeocodingConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::telemetry::LoggingConfig;

/// Prefix of configuration environment variables
pub const ENV_PREFIX: &str = "GEOCODER";

/// Separator between nested keys in environment variable names
pub const ENV_SEPARATOR: &str = "__";

/// Location of an external field-mapping document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingConfig {
    /// Path to a TOML mapping document; the bundled table is used when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Geocoding service settings
    #[serde(default)]
    pub geocoding: GeocodingConfig,

    /// Field-mapping document location
    #[serde(default)]
    pub mapping: MappingConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from `config.toml` (if present) and the environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from an explicit file (required) or `config.toml`
    /// (optional), then the environment
    pub fn load_from(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        Self::build(path, environment_source())
    }

    fn build(
        path: Option<&Path>,
        environment: config::Environment,
    ) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("config").required(false),
        };

        let config = config::Config::builder()
            .add_source(file)
            .add_source(environment)
            .build()?;

        let app_config: Self = config.try_deserialize()?;
        debug!(?app_config, "Configuration loaded");
        Ok(app_config)
    }

    /// Validate every section
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid setting.
    pub fn validate(&self) -> Result<(), String> {
        self.geocoding
            .validate()
            .map_err(|e| format!("geocoding: {e}"))?;
        self.logging.validate().map_err(|e| format!("logging: {e}"))?;
        Ok(())
    }
}

fn environment_source() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator(ENV_SEPARATOR)
}
