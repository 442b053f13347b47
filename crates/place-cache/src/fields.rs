//! Requested field specifiers, cache satisfaction, and response projection

use crate::record::{CacheRecord, Geometry};
use serde_json::{Map, Value};

/// Top-level record fields other than `geometry`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordField {
    FormattedAddress,
    PlaceId,
    Name,
    AddressComponents,
    Types,
}

impl RecordField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FormattedAddress => "formatted_address",
            Self::PlaceId => "place_id",
            Self::Name => "name",
            Self::AddressComponents => "address_components",
            Self::Types => "types",
        }
    }

    fn value(self, record: &CacheRecord) -> Option<Value> {
        match self {
            Self::FormattedAddress => record.formatted_address.clone().map(Value::String),
            Self::PlaceId => record.place_id.clone().map(Value::String),
            Self::Name => record.name.clone().map(Value::String),
            Self::AddressComponents => record.address_components.clone().map(Value::Array),
            Self::Types => record
                .types
                .as_ref()
                .map(|t| Value::Array(t.iter().cloned().map(Value::String).collect())),
        }
    }

    fn is_present(self, record: &CacheRecord) -> bool {
        match self {
            Self::FormattedAddress => record.formatted_address.is_some(),
            Self::PlaceId => record.place_id.is_some(),
            Self::Name => record.name.is_some(),
            Self::AddressComponents => record.address_components.is_some(),
            Self::Types => record.types.is_some(),
        }
    }
}

/// Parts of the `geometry` container addressable as `geometry/<part>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryPart {
    Location,
    Viewport,
}

impl GeometryPart {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Location => "location",
            Self::Viewport => "viewport",
        }
    }

    fn get(self, geometry: &Geometry) -> Option<&Value> {
        match self {
            Self::Location => geometry.location.as_ref(),
            Self::Viewport => geometry.viewport.as_ref(),
        }
    }
}

/// One entry of the caller's `fields` list
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldSpec {
    Field(RecordField),
    /// Bare `geometry`: whichever parts exist
    Geometry,
    /// `geometry/location` or `geometry/viewport`
    GeometryPart(GeometryPart),
    /// Anything else. Forwarded upstream untouched, never cached.
    Unknown(String),
}

impl FieldSpec {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "formatted_address" => Self::Field(RecordField::FormattedAddress),
            "place_id" => Self::Field(RecordField::PlaceId),
            "name" => Self::Field(RecordField::Name),
            "address_components" => Self::Field(RecordField::AddressComponents),
            "types" => Self::Field(RecordField::Types),
            "geometry" => Self::Geometry,
            "geometry/location" => Self::GeometryPart(GeometryPart::Location),
            "geometry/viewport" => Self::GeometryPart(GeometryPart::Viewport),
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Parse a comma-separated list; blank entries are skipped
    pub fn parse_list(raw: &str) -> Vec<Self> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Self::parse)
            .collect()
    }

    /// The six top-level fields, in stored order
    pub fn canonical() -> Vec<Self> {
        vec![
            Self::Field(RecordField::FormattedAddress),
            Self::Geometry,
            Self::Field(RecordField::PlaceId),
            Self::Field(RecordField::Name),
            Self::Field(RecordField::AddressComponents),
            Self::Field(RecordField::Types),
        ]
    }

    /// Wire form, as sent upstream
    pub fn as_str(&self) -> &str {
        match self {
            Self::Field(f) => f.as_str(),
            Self::Geometry => "geometry",
            Self::GeometryPart(GeometryPart::Location) => "geometry/location",
            Self::GeometryPart(GeometryPart::Viewport) => "geometry/viewport",
            Self::Unknown(raw) => raw,
        }
    }

    fn is_satisfied_by(&self, record: &CacheRecord) -> bool {
        match self {
            Self::Field(f) => f.is_present(record),
            Self::Geometry => record.geometry.as_ref().is_some_and(|g| !g.is_empty()),
            Self::GeometryPart(part) => record
                .geometry
                .as_ref()
                .and_then(|g| part.get(g))
                .is_some(),
            Self::Unknown(_) => false,
        }
    }
}

/// Specifiers in `requested` that `record` cannot answer, in request order.
///
/// An empty result is a full cache hit. With no record every specifier is
/// missing.
pub fn missing_fields(record: Option<&CacheRecord>, requested: &[FieldSpec]) -> Vec<FieldSpec> {
    requested
        .iter()
        .filter(|spec| !record.is_some_and(|r| spec.is_satisfied_by(r)))
        .cloned()
        .collect()
}

/// Build the response object holding exactly the requested data present in `record`
pub fn project(record: &CacheRecord, requested: &[FieldSpec]) -> Map<String, Value> {
    let mut out = Map::new();

    for spec in requested {
        match spec {
            FieldSpec::Geometry => {
                if let Some(geometry) = &record.geometry {
                    out.insert("geometry".to_string(), geometry.to_json());
                }
            }
            FieldSpec::GeometryPart(part) => {
                let Some(value) = record.geometry.as_ref().and_then(|g| part.get(g)) else {
                    continue;
                };
                let slot = out
                    .entry("geometry")
                    .or_insert_with(|| Value::Object(Map::new()));
                if let Value::Object(geometry) = slot {
                    geometry.insert(part.as_str().to_string(), value.clone());
                }
            }
            FieldSpec::Field(field) => {
                if let Some(value) = field.value(record) {
                    out.insert(field.as_str().to_string(), value);
                }
            }
            FieldSpec::Unknown(_) => {}
        }
    }

    out
}
