//! HTTP fetch with a fixed retry budget
//!
//! Transient transport failures (connection errors, timeouts, non-success
//! HTTP status) are retried up to `max_attempts` times with a fixed pause in
//! between. Exhausting the budget is not an error: the fetch resolves to
//! `None`. Anything else (malformed URL, request construction faults) is
//! returned immediately without consuming an attempt.

use std::time::Duration;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest::Client;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::GeocodingConfig;
use crate::error::GeocodingError;

/// Retrieves raw response bodies
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// GET `url` and return the full body
    ///
    /// `Ok(None)` means every attempt failed transiently.
    async fn fetch(&self, url: &str) -> Result<Option<String>, GeocodingError>;
}

/// Fetcher backed by `reqwest`
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout_secs: u64,
    max_attempts: u32,
    pause: Duration,
}

impl HttpFetcher {
    /// Create a fetcher from the client configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid (zero timeout or
    /// retry budget) or the HTTP client cannot be initialized.
    pub fn new(config: &GeocodingConfig) -> Result<Self, GeocodingError> {
        config.validate().map_err(GeocodingError::Configuration)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| GeocodingError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            timeout_secs: config.timeout_secs,
            max_attempts: config.max_attempts,
            pause: Duration::from_millis(config.retry_pause_ms),
        })
    }

    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    #[must_use]
    pub const fn pause(&self) -> Duration {
        self.pause
    }

    async fn attempt(&self, url: &Url) -> Result<String, GeocodingError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.classify(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodingError::HttpStatus {
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| self.classify(&e))
    }

    fn classify(&self, error: &reqwest::Error) -> GeocodingError {
        if error.is_timeout() {
            GeocodingError::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else if error.is_builder() {
            GeocodingError::RequestFailed(error.to_string())
        } else {
            GeocodingError::ConnectionFailed(error.to_string())
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    #[instrument(skip(self, url))]
    async fn fetch(&self, url: &str) -> Result<Option<String>, GeocodingError> {
        let url = Url::parse(url).map_err(|e| GeocodingError::InvalidUrl(e.to_string()))?;

        for attempt in 1..=self.max_attempts {
            match self.attempt(&url).await {
                Ok(body) => {
                    if attempt > 1 {
                        debug!(attempt, "Fetch succeeded after retries");
                    }
                    return Ok(Some(body));
                },
                Err(err) if err.is_retryable() => {
                    warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %err,
                        "Fetch attempt failed"
                    );
                    if attempt < self.max_attempts {
                        tokio::time::sleep(self.pause).await;
                    }
                },
                Err(err) => return Err(err),
            }
        }

        warn!(
            max_attempts = self.max_attempts,
            "Fetch unresolved after all attempts"
        );
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_config_knobs() {
        let config = GeocodingConfig {
            max_attempts: 7,
            retry_pause_ms: 25,
            ..GeocodingConfig::for_testing()
        };
        let fetcher = HttpFetcher::new(&config).unwrap();
        assert_eq!(fetcher.max_attempts(), 7);
        assert_eq!(fetcher.pause(), Duration::from_millis(25));
    }

    #[test]
    fn zero_attempts_rejected() {
        let config = GeocodingConfig {
            max_attempts: 0,
            ..GeocodingConfig::for_testing()
        };
        assert!(matches!(
            HttpFetcher::new(&config),
            Err(GeocodingError::Configuration(_))
        ));
    }

    #[test]
    fn zero_timeout_rejected() {
        let config = GeocodingConfig {
            timeout_secs: 0,
            ..GeocodingConfig::for_testing()
        };
        assert!(matches!(
            HttpFetcher::new(&config),
            Err(GeocodingError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn malformed_url_fails_without_retry() {
        let fetcher = HttpFetcher::new(&GeocodingConfig::for_testing()).unwrap();
        let result = fetcher.fetch("not a url").await;
        assert!(matches!(result, Err(GeocodingError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn unreachable_host_exhausts_attempts() {
        let config = GeocodingConfig {
            max_attempts: 2,
            retry_pause_ms: 1,
            timeout_secs: 1,
            ..GeocodingConfig::for_testing()
        };
        let fetcher = HttpFetcher::new(&config).unwrap();
        // Port 9 (discard) on localhost is closed on test machines
        let result = fetcher.fetch("http://127.0.0.1:9/geocode/xml").await;
        assert!(matches!(result, Ok(None)));
    }
}
