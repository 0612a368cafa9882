//! Geocoding service configuration

use std::fmt;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Payload format requested from the geocoding service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum ResponseFormat {
    /// XML payload (`/xml` endpoint)
    #[default]
    Xml,
    /// JSON payload (`/json` endpoint)
    Json,
}

impl ResponseFormat {
    /// Resolve a format name case-insensitively; unknown names fall back to XML
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Xml
        }
    }

    /// Path segment of the endpoint for this format
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Xml => "xml",
            Self::Json => "json",
        }
    }
}

impl From<String> for ResponseFormat {
    fn from(value: String) -> Self {
        Self::from_name(&value)
    }
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for the Google Geocoding API v3 client
#[derive(Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Base URL of the geocoding endpoint, without the format segment
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Response payload format
    #[serde(default)]
    pub response_format: ResponseFormat,

    /// Premium-plan client identifier, sent as `client=` when set
    #[serde(default)]
    pub client_id: Option<String>,

    /// URL-safe base64 signing key (sensitive, never serialized)
    #[serde(default, skip_serializing)]
    pub signing_key: Option<SecretString>,

    /// Per-attempt transport timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum number of fetch attempts per lookup
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Pause between fetch attempts in milliseconds
    #[serde(default = "default_retry_pause_ms")]
    pub retry_pause_ms: u64,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl fmt::Debug for GeocodingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeocodingConfig")
            .field("base_url", &self.base_url)
            .field("response_format", &self.response_format)
            .field("client_id", &self.client_id)
            .field(
                "signing_key",
                &if self.signing_key.is_some() {
                    Some("[REDACTED]")
                } else {
                    None
                },
            )
            .field("timeout_secs", &self.timeout_secs)
            .field("max_attempts", &self.max_attempts)
            .field("retry_pause_ms", &self.retry_pause_ms)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

fn default_base_url() -> String {
    "http://maps.googleapis.com/maps/api/geocode".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

const fn default_max_attempts() -> u32 {
    4
}

const fn default_retry_pause_ms() -> u64 {
    300
}

fn default_user_agent() -> String {
    format!("geocoder/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            response_format: ResponseFormat::default(),
            client_id: None,
            signing_key: None,
            timeout_secs: default_timeout_secs(),
            max_attempts: default_max_attempts(),
            retry_pause_ms: default_retry_pause_ms(),
            user_agent: default_user_agent(),
        }
    }
}

impl GeocodingConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            retry_pause_ms: 10,
            ..Default::default()
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.trim().is_empty() {
            return Err("base_url must not be empty".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        if self.max_attempts == 0 {
            return Err("max_attempts must be greater than 0".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GeocodingConfig::default();
        assert_eq!(
            config.base_url,
            "http://maps.googleapis.com/maps/api/geocode"
        );
        assert_eq!(config.response_format, ResponseFormat::Xml);
        assert!(config.client_id.is_none());
        assert!(config.signing_key.is_none());
        assert_eq!(config.max_attempts, 4);
        assert_eq!(config.retry_pause_ms, 300);
        assert!(config.user_agent.starts_with("geocoder/"));
    }

    #[test]
    fn test_testing_config() {
        let config = GeocodingConfig::for_testing();
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.retry_pause_ms, 10);
    }

    #[test]
    fn test_format_names() {
        assert_eq!(ResponseFormat::from_name("json"), ResponseFormat::Json);
        assert_eq!(ResponseFormat::from_name("JSON"), ResponseFormat::Json);
        assert_eq!(ResponseFormat::from_name("Xml"), ResponseFormat::Xml);
        assert_eq!(ResponseFormat::from_name("yaml"), ResponseFormat::Xml);
        assert_eq!(ResponseFormat::Json.to_string(), "json");
    }

    #[test]
    fn test_validation_success() {
        assert!(GeocodingConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validation_empty_base_url() {
        let config = GeocodingConfig {
            base_url: "  ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_timeout() {
        let config = GeocodingConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_attempts() {
        let config = GeocodingConfig {
            max_attempts: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_signing_key() {
        let config = GeocodingConfig {
            signing_key: Some(SecretString::from("vNIXE0xscrmjlyV-12Nj_BvUPaw=")),
            ..Default::default()
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("vNIXE0"));
    }

    #[test]
    fn test_deserialization_with_defaults() {
        let json = r#"{"response_format":"JSON","client_id":"clientID","signing_key":"abc="}"#;
        let config: GeocodingConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.response_format, ResponseFormat::Json);
        assert_eq!(config.client_id.as_deref(), Some("clientID"));
        assert!(config.signing_key.is_some());
        assert_eq!(config.max_attempts, 4);
    }

    #[test]
    fn test_serialization_skips_signing_key() {
        let config = GeocodingConfig {
            signing_key: Some(SecretString::from("secret")),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("signing_key"));
        assert!(json.contains("\"response_format\":\"xml\""));
    }
}
