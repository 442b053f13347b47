//! HTTP server for the places proxy
//!
//! Provides /health, the cached place-details route, and passthrough for
//! everything else under /maps/api.

use crate::error::DetailsError;
use crate::passthrough;
use crate::reconcile::Reconciler;
use crate::types::{DetailsQuery, HealthResponse};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use places_api::{PlacesClient, DETAILS_PATH};
use std::future::Future;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

/// Shared state for the HTTP server
pub struct ServerState {
    pub reconciler: Reconciler,
    pub upstream: PlacesClient,
    pub started_at: DateTime<Utc>,
}

impl ServerState {
    pub fn new(reconciler: Reconciler, upstream: PlacesClient) -> Self {
        Self {
            reconciler,
            upstream,
            started_at: Utc::now(),
        }
    }
}

pub type SharedState = Arc<ServerState>;

/// Create the HTTP router
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(DETAILS_PATH, get(place_details))
        .route("/maps/api/{*path}", get(passthrough::forward))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server, returning once `shutdown` resolves and in-flight
/// requests have drained
pub async fn start_server(
    state: SharedState,
    port: u16,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let router = create_router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
}

/// Resolves on Ctrl-C (SIGINT) or SIGTERM
pub async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    info!("Shutdown signal received");
}

/// Health check endpoint
async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let uptime_secs = elapsed_secs(state.started_at, Utc::now());

    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs,
        cache: state.reconciler.stats(),
    })
}

/// Whole seconds since `started_at`, zero if the clock has stepped backwards
fn elapsed_secs(started_at: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    (now - started_at).num_seconds().max(0) as u64
}

/// Place details, answered from cache when every requested field is held
async fn place_details(
    State(state): State<SharedState>,
    query: Result<Query<DetailsQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => {
            warn!(error = %rejection, "Rejected malformed place details query");
            return DetailsError::MalformedQuery.into_response();
        }
    };

    match state.reconciler.lookup(&query).await {
        Ok(lookup) => {
            let cache_header = if lookup.from_cache { "HIT" } else { "MISS" };
            ([("X-Cache", cache_header)], Json(lookup.body)).into_response()
        }
        Err(e) => e.into_response(),
    }
}
