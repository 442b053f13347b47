//! Cache backend abstraction and startup selection

use crate::error::Result;
use crate::memory::MemoryBackend;
use crate::record::CacheRecord;
use crate::redis_store::RedisBackend;
use async_trait::async_trait;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Which store is serving this process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Memory,
    Redis,
}

impl BackendKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Redis => "redis",
        }
    }
}

/// Key-value store of place records.
///
/// Implementations hand back native records; any text encoding a store needs
/// stays inside the implementation.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    async fn get(&self, key: &str) -> Result<Option<CacheRecord>>;

    /// Store `record` under `key`, replacing whatever was there
    async fn set(&self, key: &str, record: &CacheRecord) -> Result<()>;

    /// Returns whether an entry was removed
    async fn delete(&self, key: &str) -> Result<bool>;

    /// Release connections held by the backend
    async fn close(&self) {}
}

/// Settings for backend selection and both backends
#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub redis_url: Option<String>,
    pub probe_timeout: Duration,
    pub op_timeout: Duration,
    pub redis_ttl: Option<Duration>,
    pub memory_ttl: Duration,
    pub memory_capacity: u64,
}

impl CacheSettings {
    pub const DEFAULT_MEMORY_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);
    pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            redis_url: None,
            probe_timeout: Self::DEFAULT_PROBE_TIMEOUT,
            op_timeout: Duration::from_secs(2),
            redis_ttl: None,
            memory_ttl: Self::DEFAULT_MEMORY_TTL,
            memory_capacity: 100_000,
        }
    }
}

/// Pick the backend for this process: Redis when configured and reachable,
/// otherwise the in-process store. Never retried later.
pub async fn select_backend(settings: &CacheSettings) -> Arc<dyn CacheBackend> {
    let Some(url) = settings.redis_url.as_deref() else {
        info!("No Redis URL configured, using in-process cache");
        return Arc::new(MemoryBackend::from_settings(settings));
    };

    info!("Attempting to connect to Redis...");
    with_fallback(
        async {
            RedisBackend::connect(url, settings)
                .await
                .map(|backend| Arc::new(backend) as Arc<dyn CacheBackend>)
        },
        settings,
    )
    .await
}

/// Await `connect`; on failure fall back to the in-process store
pub async fn with_fallback<F>(connect: F, settings: &CacheSettings) -> Arc<dyn CacheBackend>
where
    F: Future<Output = Result<Arc<dyn CacheBackend>>>,
{
    match connect.await {
        Ok(backend) => {
            info!(backend = backend.kind().as_str(), "Using networked cache");
            backend
        }
        Err(e) => {
            warn!(error = %e, "Networked cache unavailable, falling back to in-process cache");
            Arc::new(MemoryBackend::from_settings(settings))
        }
    }
}
