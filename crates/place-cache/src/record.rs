//! The canonical cached shape of a place and its normalization from upstream

use places_api::{PlaceGeometry, PlaceResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Cached `geometry` container. Either part may be missing on its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewport: Option<Value>,
}

impl Geometry {
    /// True when neither `location` nor `viewport` is populated
    pub fn is_empty(&self) -> bool {
        self.location.is_none() && self.viewport.is_none()
    }

    pub fn to_json(&self) -> Value {
        let mut out = Map::new();
        if let Some(location) = &self.location {
            out.insert("location".to_string(), location.clone());
        }
        if let Some(viewport) = &self.viewport {
            out.insert("viewport".to_string(), viewport.clone());
        }
        Value::Object(out)
    }
}

impl From<PlaceGeometry> for Geometry {
    fn from(g: PlaceGeometry) -> Self {
        Self {
            location: g.location,
            viewport: g.viewport,
        }
    }
}

/// One cached place. Fields outside this set are never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_components: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<String>>,
}

impl CacheRecord {
    /// Cache key for a place identifier; one entry per place regardless of fields
    pub fn cache_key(place_id: &str) -> String {
        format!("place:{}", place_id)
    }
}

/// Normalize an upstream result into the cached shape.
///
/// The `geometry` container is always written, even when upstream sent no
/// geometry at all; satisfaction checks look at its parts, not its presence.
impl From<PlaceResult> for CacheRecord {
    fn from(result: PlaceResult) -> Self {
        Self {
            formatted_address: result.formatted_address,
            geometry: Some(result.geometry.map(Geometry::from).unwrap_or_default()),
            place_id: result.place_id,
            name: result.name,
            address_components: result.address_components,
            types: result.types,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn upstream(value: Value) -> PlaceResult {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_cache_key() {
        assert_eq!(CacheRecord::cache_key("ChIJabc"), "place:ChIJabc");
    }

    #[test]
    fn test_normalize_projects_known_fields_and_drops_the_rest() {
        let record = CacheRecord::from(upstream(json!({
            "place_id": "P",
            "name": "N",
            "formatted_address": "1 Main St",
            "types": ["cafe"],
            "address_components": [{ "long_name": "Main St", "types": ["route"] }],
            "geometry": {
                "location": { "lat": 1.0, "lng": 2.0 },
                "viewport": { "northeast": {}, "southwest": {} },
                "bounds": {}
            },
            "rating": 4.5,
            "reviews": []
        })));

        let json = serde_json::to_value(&record).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 6);
        assert!(json.get("rating").is_none());
        assert!(json["geometry"].get("bounds").is_none());
        assert_eq!(json["geometry"]["location"]["lng"], 2.0);
    }

    #[test]
    fn test_normalize_missing_fields_stay_absent() {
        let record = CacheRecord::from(upstream(json!({ "place_id": "P" })));

        assert_eq!(record.place_id.as_deref(), Some("P"));
        assert!(record.name.is_none());
        assert!(record.formatted_address.is_none());
        assert!(record.types.is_none());

        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("null"));
    }

    #[test]
    fn test_normalize_without_geometry_writes_empty_container() {
        let record = CacheRecord::from(upstream(json!({ "name": "N" })));

        let geometry = record.geometry.expect("geometry container is always written");
        assert!(geometry.is_empty());
    }

    #[test]
    fn test_normalize_keeps_single_geometry_part() {
        let record = CacheRecord::from(upstream(json!({
            "geometry": { "location": { "lat": 0.0, "lng": 0.0 } }
        })));

        let geometry = record.geometry.unwrap();
        assert!(geometry.location.is_some());
        assert!(geometry.viewport.is_none());
        assert!(!geometry.is_empty());
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let first = CacheRecord::from(upstream(json!({
            "place_id": "P",
            "name": "N",
            "types": ["a", "b"],
            "geometry": { "viewport": { "ne": 1 } },
            "extra": true
        })));

        let again = CacheRecord::from(upstream(serde_json::to_value(&first).unwrap()));
        assert_eq!(first, again);

        let empty = CacheRecord::from(PlaceResult::default());
        let empty_again = CacheRecord::from(upstream(serde_json::to_value(&empty).unwrap()));
        assert_eq!(empty, empty_again);
    }

    #[test]
    fn test_geometry_to_json() {
        let geometry = Geometry {
            location: Some(json!({ "lat": 1 })),
            viewport: None,
        };
        assert_eq!(geometry.to_json(), json!({ "location": { "lat": 1 } }));
        assert_eq!(Geometry::default().to_json(), json!({}));
    }
}
