//! Request and response types for the places proxy

use place_cache::BackendKind;
use serde::{Deserialize, Serialize};

/// Query string of the place-details route.
///
/// Every member is optional so that a missing identifier or key reaches the
/// handler and is answered with the proxy's own error body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetailsQuery {
    pub place_id: Option<String>,
    pub key: Option<String>,
    pub fields: Option<String>,
}

/// Hit/miss counters for the place-details route
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub backend: BackendKind,
    pub hits: u64,
    pub misses: u64,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
    pub cache: CacheStats,
}
