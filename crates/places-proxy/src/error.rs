//! Error types for the places proxy

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

/// Startup and process-level failures
#[derive(Debug)]
pub enum ProxyError {
    Places(places_api::PlacesError),
    Io(Box<std::io::Error>),
    Config(String),
}

impl fmt::Display for ProxyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProxyError::Places(err) => write!(f, "Upstream client error: {}", err),
            ProxyError::Io(err) => write!(f, "IO error: {}", err),
            ProxyError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for ProxyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProxyError::Places(err) => Some(err),
            ProxyError::Io(err) => Some(err.as_ref()),
            ProxyError::Config(_) => None,
        }
    }
}

impl From<places_api::PlacesError> for ProxyError {
    fn from(err: places_api::PlacesError) -> Self {
        ProxyError::Places(err)
    }
}

impl From<std::io::Error> for ProxyError {
    fn from(err: std::io::Error) -> Self {
        ProxyError::Io(Box::new(err))
    }
}

impl From<tracing_subscriber::filter::ParseError> for ProxyError {
    fn from(err: tracing_subscriber::filter::ParseError) -> Self {
        ProxyError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ProxyError>;

/// Terminal failure of a place-details request
///
/// Cache failures never appear here; they degrade to a miss.
#[derive(Debug)]
pub enum DetailsError {
    /// `place_id` or `key` missing
    Validation,
    /// Query string could not be decoded (e.g. a repeated `place_id`)
    MalformedQuery,
    /// Upstream answered with a non-OK status; its body is relayed as-is
    UpstreamRejection(serde_json::Value),
    /// Upstream could not be reached or sent garbage
    Transport(places_api::PlacesError),
}

impl IntoResponse for DetailsError {
    fn into_response(self) -> Response {
        match self {
            DetailsError::Validation => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "place_id and key are required" })),
            )
                .into_response(),
            DetailsError::MalformedQuery => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Malformed query string" })),
            )
                .into_response(),
            DetailsError::UpstreamRejection(body) => {
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            DetailsError::Transport(err) => {
                tracing::error!(error = %err, "Place details request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Failed to fetch place details" })),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ProxyError::Config("bad directive".to_string());
        assert_eq!(format!("{}", err), "Configuration error: bad directive");
    }

    #[test]
    fn test_io_error_source() {
        let err = ProxyError::from(std::io::Error::new(std::io::ErrorKind::AddrInUse, "taken"));
        assert!(format!("{}", err).contains("taken"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_details_error_status_codes() {
        assert_eq!(
            DetailsError::Validation.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            DetailsError::MalformedQuery.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            DetailsError::UpstreamRejection(json!({ "status": "NOT_FOUND" }))
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );

        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(
            DetailsError::Transport(json_err.into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
