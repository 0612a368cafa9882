//! Declarative field-mapping table
//!
//! The table decides which parts of an upstream result survive flattening
//! and under which flat key. Keeping it as data means upstream schema drift
//! only needs a document update, not a code change.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::GeocodingError;

/// Bundled table for Google Geocoding API v3 responses
const GOOGLE_V3_FIELDS: &str = include_str!("../resources/google_v3_fields.toml");

/// How a flat key that appears more than once is resolved
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precedence {
    /// Later values overwrite earlier ones
    #[default]
    LastWins,
    /// The first value written is kept
    FirstWins,
}

/// Which name of an address component is used as its value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentName {
    /// Abbreviated name, e.g. `NY`
    #[default]
    ShortName,
    /// Full name, e.g. `New York`
    LongName,
}

/// Upstream field names to flat keys
///
/// Loaded once and shared read-only by every decode.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldMapping {
    version: u32,
    #[serde(default)]
    precedence: Precedence,
    #[serde(default)]
    component_name: ComponentName,
    #[serde(default)]
    components: BTreeMap<String, String>,
    #[serde(default)]
    fields: BTreeMap<String, String>,
}

impl FieldMapping {
    /// Parse a mapping document
    ///
    /// # Errors
    ///
    /// Returns `GeocodingError::Mapping` if the document is not valid TOML,
    /// has unknown keys, or maps nothing.
    pub fn from_toml(document: &str) -> Result<Self, GeocodingError> {
        let mapping: Self =
            toml::from_str(document).map_err(|e| GeocodingError::Mapping(e.to_string()))?;
        mapping.validate()?;
        Ok(mapping)
    }

    /// The bundled Google Geocoding API v3 mapping
    ///
    /// # Errors
    ///
    /// Returns `GeocodingError::Mapping` if the bundled document is invalid.
    pub fn google_v3() -> Result<Self, GeocodingError> {
        Self::from_toml(GOOGLE_V3_FIELDS)
    }

    fn validate(&self) -> Result<(), GeocodingError> {
        if self.version == 0 {
            return Err(GeocodingError::Mapping(
                "version must be greater than 0".to_string(),
            ));
        }

        if self.components.is_empty() && self.fields.is_empty() {
            return Err(GeocodingError::Mapping(
                "mapping must list at least one component or field".to_string(),
            ));
        }

        let empty = self
            .components
            .iter()
            .chain(&self.fields)
            .find(|(from, to)| from.trim().is_empty() || to.trim().is_empty());
        if let Some((from, to)) = empty {
            return Err(GeocodingError::Mapping(format!(
                "empty name in mapping entry '{from}' = '{to}'"
            )));
        }

        Ok(())
    }

    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    #[must_use]
    pub const fn precedence(&self) -> Precedence {
        self.precedence
    }

    #[must_use]
    pub const fn component_name(&self) -> ComponentName {
        self.component_name
    }

    /// Flat key for an address-component type, if the type is kept
    #[must_use]
    pub fn component_key(&self, component_type: &str) -> Option<&str> {
        self.components.get(component_type).map(String::as_str)
    }

    /// Flat key for a slash-joined leaf path inside a result, if the path is kept
    #[must_use]
    pub fn field_key(&self, path: &str) -> Option<&str> {
        self.fields.get(path).map(String::as_str)
    }
}
