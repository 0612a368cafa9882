//! Address record entity - The normalized result of a geocoding lookup

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::Coordinate;

/// Marker that separates a street name from a disambiguation suffix
const STREET_SUFFIX_MARKER: &str = "\\:";

/// Structured address returned by a forward or reverse geocode
///
/// Records are assembled once through [`AddressRecordBuilder`]. Afterwards only
/// the position may be replaced, via [`AddressRecord::with_position`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRecord {
    building_number: String,
    building_range: Option<(i32, i32)>,
    building_segment_name: String,
    street: String,
    township: String,
    city: String,
    county: String,
    state: String,
    country_name: String,
    country_code: String,
    postal_code: String,
    position: Option<Coordinate>,
}

impl AddressRecord {
    /// Start building a new record
    #[must_use]
    pub fn builder() -> AddressRecordBuilder {
        AddressRecordBuilder::default()
    }

    /// Building number
    ///
    /// Falls back to a `"low-high"` range when only a numeric range is known,
    /// and to an empty string when neither is available.
    #[must_use]
    pub fn building_number(&self) -> String {
        if !self.building_number.is_empty() {
            return self.building_number.clone();
        }
        self.building_range
            .map(|(low, high)| format!("{low}-{high}"))
            .unwrap_or_default()
    }

    /// Numeric building range (low, high), if known
    #[must_use]
    pub const fn building_range(&self) -> Option<(i32, i32)> {
        self.building_range
    }

    #[must_use]
    pub fn building_segment_name(&self) -> &str {
        &self.building_segment_name
    }

    #[must_use]
    pub fn street(&self) -> &str {
        &self.street
    }

    #[must_use]
    pub fn township(&self) -> &str {
        &self.township
    }

    #[must_use]
    pub fn city(&self) -> &str {
        &self.city
    }

    #[must_use]
    pub fn county(&self) -> &str {
        &self.county
    }

    #[must_use]
    pub fn state(&self) -> &str {
        &self.state
    }

    #[must_use]
    pub fn country_name(&self) -> &str {
        &self.country_name
    }

    #[must_use]
    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    #[must_use]
    pub fn postal_code(&self) -> &str {
        &self.postal_code
    }

    /// Position of the address, if one was decoded
    #[must_use]
    pub const fn position(&self) -> Option<Coordinate> {
        self.position
    }

    /// Replace the position, keeping every address field
    #[must_use]
    pub fn with_position(mut self, position: Coordinate) -> Self {
        self.position = Some(position);
        self
    }
}

/// Builder for [`AddressRecord`]
#[derive(Debug, Default)]
pub struct AddressRecordBuilder {
    record: AddressRecord,
}

impl AddressRecordBuilder {
    #[must_use]
    pub fn building_number(mut self, value: impl Into<String>) -> Self {
        self.record.building_number = value.into();
        self
    }

    /// Set a numeric building range
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` if `low` is greater than `high`.
    pub fn building_range(mut self, low: i32, high: i32) -> Result<Self, DomainError> {
        if low > high {
            return Err(DomainError::ValidationError(format!(
                "building range low {low} exceeds high {high}"
            )));
        }
        self.record.building_range = Some((low, high));
        Ok(self)
    }

    #[must_use]
    pub fn building_segment_name(mut self, value: impl Into<String>) -> Self {
        self.record.building_segment_name = value.into();
        self
    }

    /// Set the street, dropping any `\:` disambiguation suffix
    #[must_use]
    pub fn street(mut self, value: impl Into<String>) -> Self {
        let mut street = value.into();
        if let Some(index) = street.find(STREET_SUFFIX_MARKER) {
            street.truncate(index);
        }
        self.record.street = street;
        self
    }

    #[must_use]
    pub fn township(mut self, value: impl Into<String>) -> Self {
        self.record.township = value.into();
        self
    }

    #[must_use]
    pub fn city(mut self, value: impl Into<String>) -> Self {
        self.record.city = value.into();
        self
    }

    #[must_use]
    pub fn county(mut self, value: impl Into<String>) -> Self {
        self.record.county = value.into();
        self
    }

    #[must_use]
    pub fn state(mut self, value: impl Into<String>) -> Self {
        self.record.state = value.into();
        self
    }

    #[must_use]
    pub fn country_name(mut self, value: impl Into<String>) -> Self {
        self.record.country_name = value.into();
        self
    }

    #[must_use]
    pub fn country_code(mut self, value: impl Into<String>) -> Self {
        self.record.country_code = value.into();
        self
    }

    #[must_use]
    pub fn postal_code(mut self, value: impl Into<String>) -> Self {
        self.record.postal_code = value.into();
        self
    }

    #[must_use]
    pub const fn position(mut self, position: Option<Coordinate>) -> Self {
        self.record.position = position;
        self
    }

    #[must_use]
    pub fn build(self) -> AddressRecord {
        self.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_all_fields() {
        let record = AddressRecord::builder()
            .building_number("33")
            .street("Dune Walk")
            .township("Fire Island")
            .city("Brookhaven")
            .county("Suffolk")
            .state("NY")
            .country_name("US")
            .country_code("US")
            .postal_code("11772")
            .position(Some(Coordinate::new(40.714_224, -72.961_452)))
            .build();

        assert_eq!(record.building_number(), "33");
        assert_eq!(record.street(), "Dune Walk");
        assert_eq!(record.township(), "Fire Island");
        assert_eq!(record.city(), "Brookhaven");
        assert_eq!(record.county(), "Suffolk");
        assert_eq!(record.state(), "NY");
        assert_eq!(record.country_name(), "US");
        assert_eq!(record.country_code(), "US");
        assert_eq!(record.postal_code(), "11772");
        assert_eq!(
            record.position(),
            Some(Coordinate::new(40.714_224, -72.961_452))
        );
    }

    #[test]
    fn empty_record_has_empty_strings() {
        let record = AddressRecord::builder().build();
        assert_eq!(record.building_number(), "");
        assert_eq!(record.building_segment_name(), "");
        assert_eq!(record.city(), "");
        assert!(record.position().is_none());
    }

    #[test]
    fn street_suffix_is_stripped() {
        let record = AddressRecord::builder()
            .street("Main Street\\:Springfield")
            .build();
        assert_eq!(record.street(), "Main Street");
    }

    #[test]
    fn street_without_suffix_is_kept() {
        let record = AddressRecord::builder().street("Main: Street").build();
        assert_eq!(record.street(), "Main: Street");
    }

    #[test]
    fn building_range_used_when_no_number() {
        let record = AddressRecord::builder()
            .building_range(100, 198)
            .unwrap()
            .build();
        assert_eq!(record.building_number(), "100-198");
        assert_eq!(record.building_range(), Some((100, 198)));
    }

    #[test]
    fn building_number_takes_precedence_over_range() {
        let record = AddressRecord::builder()
            .building_range(100, 198)
            .unwrap()
            .building_number("120")
            .build();
        assert_eq!(record.building_number(), "120");
    }

    #[test]
    fn inverted_building_range_rejected() {
        let result = AddressRecord::builder().building_range(10, 2);
        assert!(matches!(result, Err(DomainError::ValidationError(_))));
    }

    #[test]
    fn with_position_replaces_only_position() {
        let record = AddressRecord::builder().city("Brookhaven").build();
        let moved = record.clone().with_position(Coordinate::new(1.0, 2.0));
        assert_eq!(moved.city(), "Brookhaven");
        assert_eq!(moved.position(), Some(Coordinate::new(1.0, 2.0)));
        assert!(record.position().is_none());
    }

    #[test]
    fn serialization_roundtrip() {
        let record = AddressRecord::builder()
            .city("Brookhaven")
            .position(Some(Coordinate::new(1.0, 2.0)))
            .build();
        let json = serde_json::to_string(&record).unwrap();
        let back: AddressRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
