//! Log subscriber setup
//!
//! Console output through `tracing_subscriber`, either human-readable or as
//! JSON lines.

mod subscriber;

pub use subscriber::{LogFormat, LoggingConfig, TelemetryError, filter_directive, init_logging};
