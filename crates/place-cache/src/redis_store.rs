//! Networked cache backend on Redis
//!
//! Records are stored as JSON text; callers only ever see [`CacheRecord`]s.

use crate::backend::{BackendKind, CacheBackend, CacheSettings};
use crate::error::{CacheError, Result};
use crate::record::CacheRecord;
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use std::future::Future;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

pub struct RedisBackend {
    conn: RwLock<Option<ConnectionManager>>,
    ttl: Option<Duration>,
    op_timeout: Duration,
}

impl RedisBackend {
    /// Connect and PING, both within `settings.probe_timeout`
    pub async fn connect(url: &str, settings: &CacheSettings) -> Result<Self> {
        let client = redis::Client::open(url)?;

        let probe = async {
            let mut manager = ConnectionManager::new(client).await?;
            let pong: String = redis::cmd("PING").query_async(&mut manager).await?;
            Ok::<_, redis::RedisError>((manager, pong))
        };

        let (manager, pong) = tokio::time::timeout(settings.probe_timeout, probe)
            .await
            .map_err(|_| CacheError::Timeout("connect"))??;

        info!(reply = %pong, "Redis ping successful");

        Ok(Self {
            conn: RwLock::new(Some(manager)),
            ttl: settings.redis_ttl,
            op_timeout: settings.op_timeout,
        })
    }

    async fn connection(&self) -> Result<ConnectionManager> {
        self.conn.read().await.clone().ok_or(CacheError::Closed)
    }
}

/// Runs one Redis command within `limit`, logging which command failed
async fn bounded<T, F>(op: &'static str, limit: Duration, fut: F) -> Result<T>
where
    F: Future<Output = redis::RedisResult<T>>,
{
    let result = match tokio::time::timeout(limit, fut).await {
        Ok(reply) => reply.map_err(CacheError::from),
        Err(_) => Err(CacheError::Timeout(op)),
    };

    if let Err(e) = &result {
        warn!(command = op, error = %e, "Redis command failed");
    }
    result
}

/// Records travel to Redis as JSON text
fn encode(record: &CacheRecord) -> Result<String> {
    Ok(serde_json::to_string(record)?)
}

fn decode(text: &str) -> Result<CacheRecord> {
    Ok(serde_json::from_str(text)?)
}

#[async_trait]
impl CacheBackend for RedisBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Redis
    }

    async fn get(&self, key: &str) -> Result<Option<CacheRecord>> {
        let mut conn = self.connection().await?;
        let raw: Option<String> = bounded(
            "get",
            self.op_timeout,
            redis::cmd("GET").arg(key).query_async(&mut conn),
        )
        .await?;

        match raw {
            Some(text) => decode(&text).map(Some).inspect_err(|e| {
                warn!(key, error = %e, "Discarding unreadable cached record");
            }),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, record: &CacheRecord) -> Result<()> {
        let payload = encode(record)?;
        let mut conn = self.connection().await?;

        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(payload);
        if let Some(ttl) = self.ttl {
            cmd.arg("EX").arg(ttl.as_secs().max(1));
        }

        let () = bounded("set", self.op_timeout, cmd.query_async(&mut conn)).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let mut conn = self.connection().await?;
        let removed: i64 = bounded(
            "delete",
            self.op_timeout,
            redis::cmd("DEL").arg(key).query_async(&mut conn),
        )
        .await?;
        Ok(removed > 0)
    }

    async fn close(&self) {
        if self.conn.write().await.take().is_some() {
            debug!("Redis connection released");
        }
    }
}
