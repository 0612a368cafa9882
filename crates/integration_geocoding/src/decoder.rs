//! Response decoding
//!
//! Decoding runs in two stages. [`ResponseDecoder::flatten`] reduces the raw
//! XML or JSON payload to [`FlatFields`] through the [`FieldMapping`] table.
//! [`ResponseDecoder::build_record`] then assembles an [`AddressRecord`] from
//! the flat keys with fixed precedence rules.

use std::collections::BTreeMap;
use std::sync::Arc;

use domain::{AddressRecord, Coordinate};
use quick_xml::Reader;
use quick_xml::events::Event;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ResponseFormat;
use crate::error::GeocodingError;
use crate::mapping::{ComponentName, FieldMapping, Precedence};

/// Literal status element of a successful XML response
const XML_SUCCESS_MARKER: &str = "<status>OK</status>";

/// Status value of a successful JSON response
const JSON_SUCCESS_STATUS: &str = "OK";

const RESULT: &str = "result";
const ADDRESS_COMPONENT: &str = "address_component";

// Flat keys consumed when assembling a record
const STREET_NUMBER: &str = "street_number";
const ROUTE: &str = "route";
const LOCALITY: &str = "locality";
const ADMIN_LEVEL_3: &str = "administrative_area_level_3";
const ADMIN_LEVEL_2: &str = "administrative_area_level_2";
const ADMIN_LEVEL_1: &str = "administrative_area_level_1";
const COUNTRY: &str = "country";
const POSTAL_CODE: &str = "postal_code";
const LATITUDE: &str = "lat";
const LONGITUDE: &str = "lng";

/// Flat key/value view of a response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatFields {
    entries: BTreeMap<String, String>,
}

impl FlatFields {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn put(&mut self, key: &str, value: String, precedence: Precedence) {
        match precedence {
            Precedence::LastWins => {
                self.entries.insert(key.to_string(), value);
            },
            Precedence::FirstWins => {
                self.entries.entry(key.to_string()).or_insert(value);
            },
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FlatFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// One address component of a result, before mapping
#[derive(Debug, Default)]
struct RawComponent {
    long_name: String,
    short_name: String,
    types: Vec<String>,
}

/// One result of a response, before mapping
#[derive(Debug, Default)]
struct RawResult {
    components: Vec<RawComponent>,
    /// Slash-joined leaf paths relative to the result, with their text
    leaves: Vec<(String, String)>,
}

/// Turns raw payloads into address records
#[derive(Debug, Clone)]
pub struct ResponseDecoder {
    mapping: Arc<FieldMapping>,
}

impl ResponseDecoder {
    #[must_use]
    pub const fn new(mapping: Arc<FieldMapping>) -> Self {
        Self { mapping }
    }

    #[must_use]
    pub fn mapping(&self) -> &FieldMapping {
        &self.mapping
    }

    /// Whether the payload reports an `OK` upstream status
    ///
    /// Every other status (`ZERO_RESULTS`, `OVER_QUERY_LIMIT`,
    /// `REQUEST_DENIED`, `INVALID_REQUEST`, ...) counts as no result.
    #[must_use]
    pub fn is_success(body: &str, format: ResponseFormat) -> bool {
        match format {
            ResponseFormat::Xml => body.contains(XML_SUCCESS_MARKER),
            ResponseFormat::Json => serde_json::from_str::<Value>(body)
                .ok()
                .and_then(|v| v.get("status").and_then(Value::as_str).map(str::to_owned))
                .is_some_and(|status| status == JSON_SUCCESS_STATUS),
        }
    }

    /// Decode a payload straight to a record
    ///
    /// The caller is expected to have checked [`Self::is_success`] first.
    ///
    /// # Errors
    ///
    /// Returns `GeocodingError::Decode` if the payload is malformed.
    pub fn decode(
        &self,
        body: &str,
        format: ResponseFormat,
    ) -> Result<Option<AddressRecord>, GeocodingError> {
        let fields = self.flatten(body, format)?;
        Ok(Self::build_record(&fields))
    }

    /// First stage: reduce a payload to flat fields via the mapping table
    ///
    /// # Errors
    ///
    /// Returns `GeocodingError::Decode` if the payload is malformed.
    pub fn flatten(&self, body: &str, format: ResponseFormat) -> Result<FlatFields, GeocodingError> {
        let results = match format {
            ResponseFormat::Xml => parse_xml_results(body)?,
            ResponseFormat::Json => parse_json_results(body)?,
        };
        let fields = self.apply_mapping(results);
        debug!(count = fields.len(), "Flattened response fields");
        Ok(fields)
    }

    fn apply_mapping(&self, results: Vec<RawResult>) -> FlatFields {
        let precedence = self.mapping.precedence();
        let mut fields = FlatFields::new();

        for result in results {
            for component in result.components {
                let (preferred, other) = match self.mapping.component_name() {
                    ComponentName::ShortName => (component.short_name, component.long_name),
                    ComponentName::LongName => (component.long_name, component.short_name),
                };
                let value = if preferred.is_empty() { other } else { preferred };

                for component_type in &component.types {
                    if let Some(key) = self.mapping.component_key(component_type) {
                        fields.put(key, value.clone(), precedence);
                    }
                }
            }

            for (path, value) in result.leaves {
                if let Some(key) = self.mapping.field_key(&path) {
                    fields.put(key, value, precedence);
                }
            }
        }

        fields
    }

    /// Second stage: assemble a record from flat fields
    ///
    /// Returns `None` when there are no fields at all. A position is only set
    /// when both `lat` and `lng` parse as numbers.
    #[must_use]
    pub fn build_record(fields: &FlatFields) -> Option<AddressRecord> {
        if fields.is_empty() {
            return None;
        }

        let present = |key: &str| fields.get(key).filter(|v| !v.is_empty());
        let mut builder = AddressRecord::builder();

        if let Some(v) = present(STREET_NUMBER) {
            builder = builder.building_number(v);
        }
        if let Some(v) = present(ROUTE) {
            builder = builder.street(v);
        }
        if let Some(v) = present(ADMIN_LEVEL_3).or_else(|| present(LOCALITY)) {
            builder = builder.city(v);
        }
        if let Some(v) = present(ADMIN_LEVEL_2) {
            builder = builder.county(v);
        }
        if let Some(v) = present(ADMIN_LEVEL_1) {
            builder = builder.state(v);
        }
        if let Some(v) = present(COUNTRY) {
            builder = builder.country_name(v);
        }
        if let Some(v) = present(POSTAL_CODE) {
            builder = builder.postal_code(v);
        }

        let position = match (fields.get(LATITUDE), fields.get(LONGITUDE)) {
            (Some(lat), Some(lng)) => Coordinate::from_parts(lat, lng)
                .inspect_err(|e| warn!(error = %e, "Ignoring unparseable position"))
                .ok(),
            _ => None,
        };

        Some(
            builder
                .country_code("")
                .building_segment_name("")
                .position(position)
                .build(),
        )
    }
}

fn decode_error(context: &str, error: impl std::fmt::Display) -> GeocodingError {
    GeocodingError::Decode(format!("{context}: {error}"))
}

/// Collect the results of an XML payload
fn parse_xml_results(body: &str) -> Result<Vec<RawResult>, GeocodingError> {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);

    let mut results = Vec::new();
    let mut stack: Vec<String> = Vec::new();
    let mut text = String::new();
    let mut is_leaf = false;
    let mut current: Option<RawResult> = None;
    let mut component: Option<RawComponent> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                let parent = stack.last().map(String::as_str);
                if name == RESULT && current.is_none() {
                    current = Some(RawResult::default());
                } else if name == ADDRESS_COMPONENT && parent == Some(RESULT) && current.is_some() {
                    component = Some(RawComponent::default());
                }
                stack.push(name);
                text.clear();
                is_leaf = true;
            },
            Ok(Event::Text(e)) => {
                let unescaped = e
                    .unescape()
                    .map_err(|err| decode_error("invalid XML text", err))?;
                text.push_str(&unescaped);
            },
            Ok(Event::CData(e)) => {
                let raw = std::str::from_utf8(e.as_ref())
                    .map_err(|err| decode_error("invalid CDATA", err))?;
                text.push_str(raw);
            },
            Ok(Event::End(_)) => {
                let name = stack
                    .pop()
                    .ok_or_else(|| GeocodingError::Decode("unbalanced end tag".to_string()))?;

                if is_leaf {
                    record_xml_leaf(&stack, &name, &text, current.as_mut(), component.as_mut());
                }
                is_leaf = false;
                text.clear();

                if name == ADDRESS_COMPONENT && stack.last().map(String::as_str) == Some(RESULT) {
                    if let (Some(done), Some(result)) = (component.take(), current.as_mut()) {
                        result.components.push(done);
                    }
                } else if name == RESULT && !stack.iter().any(|n| n == RESULT) {
                    if let Some(done) = current.take() {
                        results.push(done);
                    }
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(GeocodingError::Decode(format!(
                    "malformed XML at byte {}: {e}",
                    reader.buffer_position()
                )));
            },
            _ => {},
        }
    }

    if let Some(open) = stack.last() {
        return Err(GeocodingError::Decode(format!(
            "unexpected end of document inside <{open}>"
        )));
    }

    Ok(results)
}

/// Attach a completed leaf element to the result or component it belongs to
fn record_xml_leaf(
    ancestors: &[String],
    name: &str,
    text: &str,
    result: Option<&mut RawResult>,
    component: Option<&mut RawComponent>,
) {
    let Some(result) = result else {
        return;
    };
    let Some(start) = ancestors.iter().position(|n| n == RESULT) else {
        return;
    };
    let relative = &ancestors[start + 1..];

    if relative.len() == 1 && relative[0] == ADDRESS_COMPONENT {
        if let Some(component) = component {
            match name {
                "long_name" => component.long_name = text.to_string(),
                "short_name" => component.short_name = text.to_string(),
                "type" => component.types.push(text.to_string()),
                _ => {},
            }
        }
        return;
    }

    let mut path = relative.join("/");
    if !path.is_empty() {
        path.push('/');
    }
    path.push_str(name);
    result.leaves.push((path, text.to_string()));
}

/// Collect the results of a JSON payload
fn parse_json_results(body: &str) -> Result<Vec<RawResult>, GeocodingError> {
    let root: Value = serde_json::from_str(body).map_err(|e| decode_error("malformed JSON", e))?;

    let items = match root.get("results") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(GeocodingError::Decode(
                "'results' is not an array".to_string(),
            ));
        },
    };

    let mut results = Vec::with_capacity(items.len());
    for item in items {
        let Value::Object(entries) = item else {
            return Err(GeocodingError::Decode("result is not an object".to_string()));
        };

        let mut raw = RawResult::default();
        for (key, value) in entries {
            if key == "address_components" {
                raw.components = parse_json_components(value)?;
            } else {
                collect_json_leaves(key.clone(), value, &mut raw.leaves);
            }
        }
        results.push(raw);
    }

    Ok(results)
}

fn parse_json_components(value: &Value) -> Result<Vec<RawComponent>, GeocodingError> {
    let Value::Array(items) = value else {
        return Err(GeocodingError::Decode(
            "'address_components' is not an array".to_string(),
        ));
    };

    let text = |item: &Value, key: &str| {
        item.get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    Ok(items
        .iter()
        .map(|item| RawComponent {
            long_name: text(item, "long_name"),
            short_name: text(item, "short_name"),
            types: item
                .get("types")
                .and_then(Value::as_array)
                .map(|types| {
                    types
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        })
        .collect())
}

fn collect_json_leaves(path: String, value: &Value, leaves: &mut Vec<(String, String)>) {
    match value {
        Value::Object(entries) => {
            for (key, child) in entries {
                collect_json_leaves(format!("{path}/{key}"), child, leaves);
            }
        },
        Value::Array(items) => {
            for item in items {
                collect_json_leaves(path.clone(), item, leaves);
            }
        },
        Value::String(s) => leaves.push((path, s.clone())),
        Value::Number(n) => leaves.push((path, n.to_string())),
        Value::Bool(b) => leaves.push((path, b.to_string())),
        Value::Null => {},
    }
}
