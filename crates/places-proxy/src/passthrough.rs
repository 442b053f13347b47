use axum::body::Body;
use axum::extract::State;
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{debug, error};

use crate::server::SharedState;

/// GET /maps/api/{*path}
/// Forwards the path and query string to the upstream host unchanged and
/// relays status, content type, and body.
pub async fn forward(State(state): State<SharedState>, uri: Uri) -> Response {
    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());

    debug!(path = %uri.path(), "Proxying request upstream");

    match state.upstream.forward(path_and_query).await {
        Ok(forwarded) => {
            let mut builder = Response::builder()
                .status(StatusCode::from_u16(forwarded.status).unwrap_or(StatusCode::BAD_GATEWAY));

            if let Some(ct) = forwarded.content_type.as_deref() {
                builder = builder.header(header::CONTENT_TYPE, ct);
            }

            builder
                .body(Body::from(forwarded.body))
                .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
        }
        Err(e) => {
            error!(error = %e, path = %uri.path(), "Error passing through API request");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error" })),
            )
                .into_response()
        }
    }
}
