//! Geocoding facade
//!
//! Orchestrates request building, fetching, status checking and decoding for
//! forward and reverse lookups.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use domain::{AddressRecord, Coordinate};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument, warn};

use crate::config::{GeocodingConfig, ResponseFormat};
use crate::decoder::ResponseDecoder;
use crate::error::GeocodingError;
use crate::fetcher::{Fetcher, HttpFetcher};
use crate::mapping::FieldMapping;
use crate::request::RequestBuilder;
use crate::signer::UrlSigner;

/// Trait for geocoding clients
///
/// `Ok(None)` means the lookup produced no usable result: the service
/// stayed unreachable after every attempt, reported a status other than
/// `OK`, or returned nothing worth mapping.
#[async_trait]
pub trait GeocodingClient: Send + Sync {
    /// Resolve a free-form address to a structured record and position
    async fn forward_geocode(
        &self,
        address: &str,
    ) -> Result<Option<AddressRecord>, GeocodingError>;

    /// Resolve a coordinate to a structured record
    ///
    /// A record whose position could not be decoded takes the input
    /// coordinate as its position.
    async fn reverse_geocode(
        &self,
        coordinate: Coordinate,
    ) -> Result<Option<AddressRecord>, GeocodingError>;
}

/// Google Geocoding API v3 client
pub struct GoogleGeocodingClient {
    requests: RequestBuilder,
    fetcher: Arc<dyn Fetcher>,
    decoder: ResponseDecoder,
}

impl fmt::Debug for GoogleGeocodingClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleGeocodingClient")
            .field("requests", &self.requests)
            .field("decoder", &self.decoder)
            .finish_non_exhaustive()
    }
}

impl GoogleGeocodingClient {
    /// Create a client with an HTTP fetcher and the bundled field mapping
    ///
    /// An invalid signing key does not fail construction; signing is
    /// disabled with a warning instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn new(config: &GeocodingConfig) -> Result<Self, GeocodingError> {
        let fetcher = HttpFetcher::new(config)?;
        Self::with_fetcher(config, Arc::new(fetcher))
    }

    /// Create a client around an existing fetcher
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the bundled field
    /// mapping cannot be loaded.
    pub fn with_fetcher(
        config: &GeocodingConfig,
        fetcher: Arc<dyn Fetcher>,
    ) -> Result<Self, GeocodingError> {
        config.validate().map_err(GeocodingError::Configuration)?;
        let mapping = FieldMapping::google_v3()?;
        let requests = RequestBuilder::new(config.base_url.clone(), config.response_format)
            .with_client_id(config.client_id.clone())
            .with_signer(signer_from(config.signing_key.as_ref()));

        Ok(Self {
            requests,
            fetcher,
            decoder: ResponseDecoder::new(Arc::new(mapping)),
        })
    }

    /// Replace the field mapping used for decoding
    #[must_use]
    pub fn with_mapping(mut self, mapping: Arc<FieldMapping>) -> Self {
        self.decoder = ResponseDecoder::new(mapping);
        self
    }

    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.requests.set_base_url(base_url);
    }

    pub const fn set_response_format(&mut self, format: ResponseFormat) {
        self.requests.set_format(format);
    }

    pub fn set_client_id(&mut self, client_id: Option<String>) {
        self.requests.set_client_id(client_id);
    }

    /// Replace the signing key, or disable signing with `None`
    ///
    /// An invalid key disables signing and logs a warning.
    pub fn set_signing_key(&mut self, key: Option<SecretString>) {
        self.requests.set_signer(signer_from(key.as_ref()));
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.requests.base_url()
    }

    #[must_use]
    pub const fn response_format(&self) -> ResponseFormat {
        self.requests.format()
    }

    #[must_use]
    pub fn client_id(&self) -> Option<&str> {
        self.requests.client_id()
    }

    /// Whether outgoing requests carry a signature
    #[must_use]
    pub const fn is_signing(&self) -> bool {
        self.requests.is_signing()
    }

    /// Fetch, status-check and decode one request URL
    async fn lookup(&self, url: &str) -> Result<Option<AddressRecord>, GeocodingError> {
        let Some(body) = self.fetcher.fetch(url).await? else {
            warn!("Geocoding lookup unresolved, no response body");
            return Ok(None);
        };

        let format = self.requests.format();
        if !ResponseDecoder::is_success(&body, format) {
            debug!(%format, "Upstream status is not OK");
            return Ok(None);
        }

        self.decoder.decode(&body, format)
    }
}

/// Build a signer from an optional key, disabling signing on a bad key
fn signer_from(key: Option<&SecretString>) -> Option<UrlSigner> {
    let key = key?;
    match UrlSigner::new(key.expose_secret()) {
        Ok(signer) => Some(signer),
        Err(e) => {
            warn!(error = %e, "Signing key rejected, requests will be sent unsigned");
            None
        },
    }
}

#[async_trait]
impl GeocodingClient for GoogleGeocodingClient {
    #[instrument(skip(self))]
    async fn forward_geocode(
        &self,
        address: &str,
    ) -> Result<Option<AddressRecord>, GeocodingError> {
        let url = self.requests.build_forward(address);
        self.lookup(&url).await
    }

    #[instrument(skip(self, coordinate), fields(%coordinate))]
    async fn reverse_geocode(
        &self,
        coordinate: Coordinate,
    ) -> Result<Option<AddressRecord>, GeocodingError> {
        let url = self
            .requests
            .build_reverse(coordinate.latitude(), coordinate.longitude());

        let record = self.lookup(&url).await?.map(|record| {
            if record.position().is_some() {
                record
            } else {
                debug!("Decoded record has no position, using the input coordinate");
                record.with_position(coordinate)
            }
        });
        Ok(record)
    }
}
