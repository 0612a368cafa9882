//! Request URL construction for forward and reverse lookups

use tracing::{debug, warn};
use url::Url;

use crate::config::ResponseFormat;
use crate::error::GeocodingError;
use crate::signer::UrlSigner;
use crate::urlencoding::encode_address;

/// Assembles geocoding request URLs
///
/// Shape: `{base}/{format}?{query}&sensor=false[&client={id}][&signature={sig}]`.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    base_url: String,
    format: ResponseFormat,
    client_id: Option<String>,
    signer: Option<UrlSigner>,
}

impl RequestBuilder {
    /// Create a builder without client ID or signer
    #[must_use]
    pub fn new(base_url: impl Into<String>, format: ResponseFormat) -> Self {
        Self {
            base_url: base_url.into(),
            format,
            client_id: None,
            signer: None,
        }
    }

    /// Send `client=<id>` with every request
    #[must_use]
    pub fn with_client_id(mut self, client_id: Option<String>) -> Self {
        self.client_id = client_id;
        self
    }

    /// Sign every request with the given signer
    #[must_use]
    pub fn with_signer(mut self, signer: Option<UrlSigner>) -> Self {
        self.signer = signer;
        self
    }

    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.base_url = base_url.into();
    }

    pub const fn set_format(&mut self, format: ResponseFormat) {
        self.format = format;
    }

    pub fn set_client_id(&mut self, client_id: Option<String>) {
        self.client_id = client_id;
    }

    pub fn set_signer(&mut self, signer: Option<UrlSigner>) {
        self.signer = signer;
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub const fn format(&self) -> ResponseFormat {
        self.format
    }

    #[must_use]
    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    /// Whether requests are signed
    #[must_use]
    pub const fn is_signing(&self) -> bool {
        self.signer.is_some()
    }

    /// Build a forward (address to coordinate) request URL
    #[must_use]
    pub fn build_forward(&self, address: &str) -> String {
        self.assemble(&format!("?address={}", encode_address(address)))
    }

    /// Build a reverse (coordinate to address) request URL
    ///
    /// Both components are written with their full default representation.
    #[must_use]
    pub fn build_reverse(&self, latitude: f64, longitude: f64) -> String {
        self.assemble(&format!("?latlng={latitude},{longitude}"))
    }

    fn assemble(&self, query: &str) -> String {
        let mut url = format!(
            "{}/{}{query}&sensor=false",
            self.base_url.trim_end_matches('/'),
            self.format
        );
        if let Some(client_id) = &self.client_id {
            url.push_str("&client=");
            url.push_str(client_id);
        }

        let Some(signer) = &self.signer else {
            return url;
        };

        match sign_url(signer, &url) {
            Ok(signed) => {
                debug!(url = %signed, "Signed request URL");
                signed
            },
            Err(error) => {
                warn!(%error, "Request signing failed, sending unsigned request");
                url
            },
        }
    }
}

/// Sign a complete URL, returning `scheme://host[:port]` plus the signed resource
///
/// # Errors
///
/// Returns `GeocodingError::InvalidUrl` if the URL cannot be parsed or has no host.
pub fn sign_url(signer: &UrlSigner, url: &str) -> Result<String, GeocodingError> {
    let parsed =
        Url::parse(url).map_err(|e| GeocodingError::InvalidUrl(format!("'{url}': {e}")))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| GeocodingError::InvalidUrl(format!("'{url}' has no host")))?;

    let mut origin = format!("{}://{host}", parsed.scheme());
    if let Some(port) = parsed.port() {
        origin.push_str(&format!(":{port}"));
    }

    let resource = signer.sign(parsed.path(), parsed.query().unwrap_or_default());
    Ok(format!("{origin}{resource}"))
}
