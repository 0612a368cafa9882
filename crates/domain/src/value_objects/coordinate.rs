//! Geographic coordinate value object

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Radius of the earth at the equator, in meters
const GLOBE_RADIUS_EQUATOR_M: f64 = 6_378_000.0;

/// Radius of the earth at the poles, in meters
const GLOBE_RADIUS_POLES_M: f64 = 6_357_000.0;

/// A latitude/longitude pair in decimal degrees
///
/// Equality and hashing compare the exact bit patterns of both components,
/// so a coordinate can be used as a map key. Two coordinates that differ only
/// by a rounding error are *not* equal, and `0.0` differs from `-0.0`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Create a coordinate from two numeric components
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Create a coordinate from separate latitude and longitude strings
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCoordinate` if either component is not numeric.
    pub fn from_parts(latitude: &str, longitude: &str) -> Result<Self, DomainError> {
        Ok(Self::new(
            parse_component(latitude, "latitude")?,
            parse_component(longitude, "longitude")?,
        ))
    }

    /// Get the latitude
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Get the longitude
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance to another coordinate, in meters
    ///
    /// Haversine formula, scaled by the earth's radius of curvature at the
    /// mean latitude of both points rather than by a fixed sphere radius.
    /// The result is symmetric: `a.distance_to(&b) == b.distance_to(&a)`.
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlat = lat2 - lat1;
        let dlon = other.longitude.to_radians() - self.longitude.to_radians();

        let a = (lat1.cos() * lat2.cos())
            .mul_add((dlon / 2.0).sin().powi(2), (dlat / 2.0).sin().powi(2));
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        radius_of_curvature(f64::midpoint(lat1, lat2)) * c
    }

    /// Initial bearing towards another coordinate, in degrees
    ///
    /// The angle is measured like theta in polar coordinates: 0 is east,
    /// 90 north, -90 south and 180 west. Range is (-180, 180].
    ///
    /// Bearing is not symmetric; `b.bearing_to(&a)` is generally not the
    /// opposite direction of `a.bearing_to(&b)` on a sphere.
    #[must_use]
    pub fn bearing_to(&self, other: &Self) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlon = other.longitude.to_radians() - self.longitude.to_radians();

        let y = (-dlon).sin() * lat2.cos();
        let x = lat1
            .cos()
            .mul_add(lat2.sin(), -(lat1.sin() * lat2.cos() * (-dlon).cos()));

        // atan2 yields a north-referenced angle; rotate so east is 0
        let mut degrees = y.atan2(x).to_degrees() + 90.0;
        if degrees > 180.0 {
            degrees -= 360.0;
        }
        degrees
    }
}

/// Radius of curvature of the earth at a latitude (radians)
///
/// Geometric mean of the extreme radii of curvature at that latitude, which
/// ignores the direction of travel.
fn radius_of_curvature(latitude: f64) -> f64 {
    let a = GLOBE_RADIUS_EQUATOR_M;
    let b = GLOBE_RADIUS_POLES_M;
    let e = (1.0 - (b / a).powi(2)).sqrt();
    a * (1.0 - e.powi(2)).sqrt() / (1.0 - (e * latitude.sin()).powi(2))
}

fn parse_component(value: &str, name: &str) -> Result<f64, DomainError> {
    value.trim().parse::<f64>().map_err(|_| {
        DomainError::InvalidCoordinate(format!("{name} is not a number: '{value}'"))
    })
}

impl PartialEq for Coordinate {
    fn eq(&self, other: &Self) -> bool {
        self.latitude.to_bits() == other.latitude.to_bits()
            && self.longitude.to_bits() == other.longitude.to_bits()
    }
}

impl Eq for Coordinate {}

impl Hash for Coordinate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.latitude.to_bits().hash(state);
        self.longitude.to_bits().hash(state);
    }
}

impl FromStr for Coordinate {
    type Err = DomainError;

    /// Parse a `"lat,lon"` string
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(',');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(lat), Some(lon), None) => Self::from_parts(lat, lon),
            _ => Err(DomainError::InvalidCoordinate(format!(
                "expected 'lat,lon' but found '{s}'"
            ))),
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5},{:.5}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn seattle() -> Coordinate {
        Coordinate::new(47.609_722, -122.333_056)
    }

    fn san_diego() -> Coordinate {
        Coordinate::new(32.715, -117.1625)
    }

    #[test]
    fn parse_valid_string() {
        let c: Coordinate = "40.714224,-72.961452".parse().unwrap();
        assert_eq!(c.latitude().to_bits(), 40.714_224_f64.to_bits());
        assert_eq!(c.longitude().to_bits(), (-72.961_452_f64).to_bits());
    }

    #[test]
    fn parse_tolerates_whitespace_around_components() {
        let c: Coordinate = " 1.5 , 2.5 ".parse().unwrap();
        assert_eq!(c, Coordinate::new(1.5, 2.5));
    }

    #[test]
    fn parse_rejects_missing_comma() {
        assert!(matches!(
            "40.7".parse::<Coordinate>(),
            Err(DomainError::InvalidCoordinate(_))
        ));
    }

    #[test]
    fn parse_rejects_extra_comma() {
        assert!("1,2,3".parse::<Coordinate>().is_err());
        assert!("1,2,".parse::<Coordinate>().is_err());
    }

    #[test]
    fn parse_rejects_non_numeric() {
        assert!("north,2".parse::<Coordinate>().is_err());
        assert!("1,".parse::<Coordinate>().is_err());
        assert!("".parse::<Coordinate>().is_err());
    }

    #[test]
    fn from_parts_parses_both_components() {
        let c = Coordinate::from_parts("37.09024", "-95.712891").unwrap();
        assert_eq!(c, Coordinate::new(37.090_24, -95.712_891));
        assert!(Coordinate::from_parts("x", "1").is_err());
    }

    #[test]
    fn display_uses_five_fraction_digits() {
        let c = Coordinate::new(40.714_224_9, -72.961_452);
        assert_eq!(c.to_string(), "40.71422,-72.96145");
        assert_eq!(Coordinate::new(1.0, -2.0).to_string(), "1.00000,-2.00000");
    }

    #[test]
    fn equality_is_bitwise() {
        assert_eq!(Coordinate::new(1.0, 2.0), Coordinate::new(1.0, 2.0));
        assert_ne!(Coordinate::new(0.1 + 0.2, 0.0), Coordinate::new(0.3, 0.0));
        assert_ne!(Coordinate::new(0.0, 0.0), Coordinate::new(-0.0, 0.0));
    }

    #[test]
    fn usable_as_hash_key() {
        let mut set = HashSet::new();
        set.insert(seattle());
        set.insert(seattle());
        set.insert(san_diego());
        assert_eq!(set.len(), 2);
        assert!(set.contains(&Coordinate::new(47.609_722, -122.333_056)));
    }

    #[test]
    fn distance_is_symmetric() {
        let there = san_diego().distance_to(&seattle());
        let back = seattle().distance_to(&san_diego());
        assert_eq!(there.to_bits(), back.to_bits());
    }

    #[test]
    fn distance_seattle_san_diego() {
        // Roughly 1,700 km apart
        let d = seattle().distance_to(&san_diego());
        assert!((d - 1_700_000.0).abs() < 30_000.0, "distance was {d}");
    }

    #[test]
    fn distance_to_self_is_zero() {
        assert!(seattle().distance_to(&seattle()).abs() < f64::EPSILON);
    }

    #[test]
    fn bearing_cardinal_directions() {
        let origin = Coordinate::new(0.0, 0.0);
        assert!((origin.bearing_to(&Coordinate::new(1.0, 0.0)) - 90.0).abs() < 1e-9);
        assert!((origin.bearing_to(&Coordinate::new(-1.0, 0.0)) + 90.0).abs() < 1e-9);
        assert!(origin.bearing_to(&Coordinate::new(0.0, 1.0)).abs() < 1e-9);
        assert!((origin.bearing_to(&Coordinate::new(0.0, -1.0)).abs() - 180.0).abs() < 1e-9);
    }

    #[test]
    fn bearing_stays_in_range() {
        let b = seattle().bearing_to(&san_diego());
        assert!(b > -180.0 && b <= 180.0);
        let b = san_diego().bearing_to(&seattle());
        assert!(b > -180.0 && b <= 180.0);
    }

    #[test]
    fn serialization_roundtrip() {
        let c = seattle();
        let json = serde_json::to_string(&c).unwrap();
        assert!(json.contains("latitude"));
        let back: Coordinate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }

    proptest! {
        #[test]
        fn parse_roundtrips_formatted_pair(lat in -90.0f64..90.0, lon in -180.0f64..180.0) {
            let c: Coordinate = format!("{lat},{lon}").parse().unwrap();
            prop_assert_eq!(c.latitude().to_bits(), lat.to_bits());
            prop_assert_eq!(c.longitude().to_bits(), lon.to_bits());
        }

        #[test]
        fn distance_symmetric_for_any_pair(
            lat1 in -90.0f64..90.0, lon1 in -180.0f64..180.0,
            lat2 in -90.0f64..90.0, lon2 in -180.0f64..180.0,
        ) {
            let a = Coordinate::new(lat1, lon1);
            let b = Coordinate::new(lat2, lon2);
            prop_assert_eq!(a.distance_to(&b).to_bits(), b.distance_to(&a).to_bits());
        }

        #[test]
        fn parse_rejects_strings_without_single_comma(s in "[0-9.]{0,12}") {
            prop_assert!(s.parse::<Coordinate>().is_err());
        }
    }
}
