//! Google Geocoding API v3 integration
//!
//! Forward (address to position) and reverse (position to address) lookups
//! against the Google Geocoding web service, with optional premium-plan
//! request signing.
//!
//! # Architecture
//!
//! A lookup flows through four stages, each behind its own type:
//!
//! 1. [`RequestBuilder`] assembles the request URL and signs it with a
//!    [`UrlSigner`] when a key is configured.
//! 2. A [`Fetcher`] (by default [`HttpFetcher`]) performs the GET with a
//!    fixed retry budget.
//! 3. [`ResponseDecoder`] checks the upstream status, flattens the payload
//!    through a [`FieldMapping`] table and assembles an `AddressRecord`.
//! 4. [`GoogleGeocodingClient`] ties the stages together behind the
//!    [`GeocodingClient`] trait.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain::Coordinate;
//! use integration_geocoding::{GeocodingClient, GeocodingConfig, GoogleGeocodingClient};
//!
//! let client = GoogleGeocodingClient::new(&GeocodingConfig::default())?;
//! if let Some(record) = client.reverse_geocode(Coordinate::new(40.714_224, -72.961_452)).await? {
//!     println!("{} {}", record.building_number(), record.street());
//! }
//! ```

mod client;
mod config;
mod decoder;
mod error;
mod fetcher;
mod mapping;
mod request;
mod signer;
mod urlencoding;

pub use client::{GeocodingClient, GoogleGeocodingClient};
pub use config::{GeocodingConfig, ResponseFormat};
pub use decoder::{FlatFields, ResponseDecoder};
pub use error::GeocodingError;
pub use fetcher::{Fetcher, HttpFetcher};
pub use mapping::{ComponentName, FieldMapping, Precedence};
pub use request::{RequestBuilder, sign_url};
pub use signer::UrlSigner;
pub use urlencoding::encode_address;
