//! Request signing for Google Maps premium-plan web service calls
//!
//! The signature is an HMAC-SHA1 over the URL path and query, keyed with a
//! private key that is distributed as URL-safe base64 (`-`/`_` instead of
//! `+`/`/`). The digest is appended as `&signature=` in the same alphabet.

use std::fmt;

use base64::Engine;
use base64::alphabet;
use base64::engine::general_purpose::URL_SAFE;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::error::GeocodingError;

type HmacSha1 = Hmac<Sha1>;

/// Key decoder that accepts URL-safe base64 with or without padding
const KEY_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Signs request resources with a decoded private key
#[derive(Clone)]
pub struct UrlSigner {
    mac: HmacSha1,
}

impl fmt::Debug for UrlSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UrlSigner")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl UrlSigner {
    /// Create a signer from a URL-safe base64 key string
    ///
    /// Keys written in the standard alphabet (`+`/`/`) are accepted as well.
    ///
    /// # Errors
    ///
    /// Returns `GeocodingError::InvalidKey` if the key is empty or is not
    /// valid base64.
    pub fn new(key: &str) -> Result<Self, GeocodingError> {
        let normalized = key.trim().replace('+', "-").replace('/', "_");
        let bytes = KEY_ENGINE
            .decode(normalized.as_bytes())
            .map_err(|e| GeocodingError::InvalidKey(e.to_string()))?;

        if bytes.is_empty() {
            return Err(GeocodingError::InvalidKey(
                "signing key must not be empty".to_string(),
            ));
        }

        let mac = HmacSha1::new_from_slice(&bytes)
            .map_err(|e| GeocodingError::InvalidKey(e.to_string()))?;

        Ok(Self { mac })
    }

    /// Compute the URL-safe base64 signature of `path?query`
    #[must_use]
    pub fn signature(&self, path: &str, query: &str) -> String {
        let resource = format!("{path}?{query}");
        self.signature_of(&resource)
    }

    /// Sign a path and query, returning `path?query&signature=<sig>`
    #[must_use]
    pub fn sign(&self, path: &str, query: &str) -> String {
        let resource = format!("{path}?{query}");
        let signature = self.signature_of(&resource);
        format!("{resource}&signature={signature}")
    }

    fn signature_of(&self, resource: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(resource.as_bytes());
        URL_SAFE.encode(mac.finalize().into_bytes())
    }
}
