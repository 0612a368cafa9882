//! Infrastructure layer - configuration and runtime setup
//!
//! Loads the layered application configuration, resolves the field-mapping
//! document handed to the decoder, and installs the log subscriber.

pub mod config;
pub mod mapping;
pub mod telemetry;

pub use config::{AppConfig, ENV_PREFIX, ENV_SEPARATOR, MappingConfig};
pub use mapping::{MappingLoadError, load_field_mapping, load_mapping_file};
pub use telemetry::{LogFormat, LoggingConfig, TelemetryError, init_logging};
