//! Geocoding error types

use thiserror::Error;

/// Errors that can occur during geocoding operations
///
/// An upstream status other than `OK` is not an error: lookups report it as
/// an absent result.
#[derive(Debug, Error)]
pub enum GeocodingError {
    /// Signing key is not valid URL-safe base64
    #[error("Invalid signing key: {0}")]
    InvalidKey(String),

    /// Connection to the geocoding service failed or broke off mid-read
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request timed out
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },

    /// Service answered with a non-success HTTP status
    #[error("Service returned HTTP {status}")]
    HttpStatus {
        /// HTTP status code
        status: u16,
    },

    /// Request URL could not be parsed
    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),

    /// Request could not be built or sent for a reason other than I/O
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Response payload could not be transformed into flat fields
    #[error("Decode error: {0}")]
    Decode(String),

    /// Field-mapping document is malformed
    #[error("Field mapping error: {0}")]
    Mapping(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl GeocodingError {
    /// Returns true if this error is a transient transport failure
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_) | Self::Timeout { .. } | Self::HttpStatus { .. }
        )
    }
}
