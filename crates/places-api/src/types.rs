//! Data types for place-lookup API responses
//!
//! Only the fields the proxy caches are modelled; everything else in the
//! upstream `result` object is ignored on deserialization.

use serde::{Deserialize, Serialize};

/// `geometry` object of a place result. Both parts are passed through opaque.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceGeometry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewport: Option<serde_json::Value>,
}

/// The `result` object of a successful place-details response
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PlaceResult {
    pub formatted_address: Option<String>,
    pub geometry: Option<PlaceGeometry>,
    pub place_id: Option<String>,
    pub name: Option<String>,
    pub address_components: Option<Vec<serde_json::Value>>,
    pub types: Option<Vec<String>>,
}

/// Outcome of a place-details lookup, decided by the payload's `status`
#[derive(Debug, Clone)]
pub enum DetailsOutcome {
    /// `status == "OK"`; the parsed `result` object
    Found(PlaceResult),
    /// Any other status; the whole upstream body, untouched
    Rejected(serde_json::Value),
}

/// A forwarded upstream response, relayed without interpretation
#[derive(Debug, Clone)]
pub struct ForwardedResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}
