//! Error types for the place-lookup API client

use std::fmt;

/// Errors that can occur when talking to the upstream place-lookup API
#[derive(Debug)]
pub enum PlacesError {
    /// HTTP request failed (connect, timeout, body read)
    Http(reqwest::Error),
    /// Response body was not the JSON we expected
    Json(serde_json::Error),
}

impl fmt::Display for PlacesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "Places HTTP error: {}", e),
            Self::Json(e) => write!(f, "Places JSON parse error: {}", e),
        }
    }
}

impl std::error::Error for PlacesError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(e) => Some(e),
            Self::Json(e) => Some(e),
        }
    }
}

impl From<reqwest::Error> for PlacesError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

impl From<serde_json::Error> for PlacesError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// Result type for place-lookup API operations
pub type Result<T> = std::result::Result<T, PlacesError>;
