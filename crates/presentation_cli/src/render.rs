//! Console rendering of lookup results

use domain::{AddressRecord, Coordinate};

/// Width of the label column, value text starts right after it
const LABEL_WIDTH: usize = 15;

/// Printed when a lookup yields no record
const NO_RESULT: &str = "ERROR";

/// Padded label/value block for an address, or `ERROR` when absent
pub fn address_block(record: Option<&AddressRecord>) -> String {
    let Some(record) = record else {
        return NO_RESULT.to_string();
    };

    let building = record.building_number();
    let rows = [
        ("BLDG #", building.as_str()),
        ("STREET", record.street()),
        ("CITY", record.city()),
        ("COUNTY", record.county()),
        ("STATE", record.state()),
        ("COUNTRY", record.country_name()),
        ("POST CODE", record.postal_code()),
    ];

    let mut out = String::new();
    for (label, value) in rows {
        out.push_str(&format!("{label:<LABEL_WIDTH$}{value}\n"));
    }
    out
}

pub fn coordinate_line(coordinate: Coordinate) -> String {
    format!(
        "Coordinate: [{},{}]",
        coordinate.latitude(),
        coordinate.longitude()
    )
}

/// Position line followed by the address block
pub fn forward_block(record: Option<&AddressRecord>) -> String {
    let Some(record) = record else {
        return NO_RESULT.to_string();
    };

    let position = record
        .position()
        .map_or_else(|| "Coordinate: unknown".to_string(), coordinate_line);
    format!("{position}\n\n{}", address_block(Some(record)))
}

pub fn distance_block(from: Coordinate, to: Coordinate) -> String {
    format!(
        "From:     {from}\nTo:       {to}\nDistance: {:.1} m\nBearing:  {:.1}",
        from.distance_to(&to),
        from.bearing_to(&to)
    )
}
