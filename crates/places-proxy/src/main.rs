//! Places Proxy - field-aware caching proxy for the place-lookup API
//!
//! Place-details lookups are answered from cache whenever the cached record
//! holds every requested field; otherwise the place is refetched, stored whole,
//! and cut down to the requested fields. Everything else under /maps/api is
//! forwarded untouched.

mod config;
mod error;
mod passthrough;
mod reconcile;
mod server;
#[cfg(test)]
mod test_support;
mod types;

use crate::config::Config;
use crate::error::Result;
use crate::reconcile::Reconciler;
use crate::server::{shutdown_signal, start_server, ServerState, SharedState};
use places_api::PlacesClient;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::from_default_env().add_directive("places_proxy=info".parse()?);

    // Use JSON format for GCP Cloud Logging when LOG_FORMAT=json
    if config.json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer())
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    };

    info!("Starting Places Proxy...");
    info!("Port: {}", config.port);
    info!("Upstream: {}", config.upstream_base_url);
    info!("Upstream timeout: {:?}", config.upstream_timeout);
    info!("In-process cache TTL: {} seconds", config.cache.memory_ttl.as_secs());

    // Backend is chosen once and kept for the life of the process
    let cache = place_cache::select_backend(&config.cache).await;
    info!("Cache backend: {}", cache.kind().as_str());

    let upstream = PlacesClient::try_new(&config.upstream_base_url, config.upstream_timeout)?;
    let reconciler = Reconciler::new(cache, upstream.clone(), config.fetch_full_record);

    let state: SharedState = Arc::new(ServerState::new(reconciler, upstream));

    let served = start_server(state.clone(), config.port, shutdown_signal()).await;

    info!("Cleaning up before exiting...");
    state.reconciler.close().await;
    info!("Cache backend released");

    served?;
    Ok(())
}
