//! In-process cache backend

use crate::backend::{BackendKind, CacheBackend, CacheSettings};
use crate::error::Result;
use crate::record::CacheRecord;
use async_trait::async_trait;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

/// moka-backed store holding records natively, with a fixed time-to-live
pub struct MemoryBackend {
    cache: Cache<String, Arc<CacheRecord>>,
}

impl MemoryBackend {
    pub fn new(ttl: Duration, max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();

        Self { cache }
    }

    pub fn from_settings(settings: &CacheSettings) -> Self {
        Self::new(settings.memory_ttl, settings.memory_capacity)
    }

    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Memory
    }

    async fn get(&self, key: &str) -> Result<Option<CacheRecord>> {
        Ok(self.cache.get(key).await.map(|r| (*r).clone()))
    }

    async fn set(&self, key: &str, record: &CacheRecord) -> Result<()> {
        self.cache
            .insert(key.to_string(), Arc::new(record.clone()))
            .await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.cache.remove(key).await.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> CacheRecord {
        CacheRecord {
            place_id: Some("P".to_string()),
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_get_missing() {
        let backend = MemoryBackend::new(Duration::from_secs(60), 10);
        assert!(backend.get("place:none").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let backend = MemoryBackend::new(Duration::from_secs(60), 10);
        backend.set("place:P", &record("N")).await.unwrap();

        let stored = backend.get("place:P").await.unwrap().unwrap();
        assert_eq!(stored, record("N"));
        assert_eq!(backend.kind(), BackendKind::Memory);
    }

    #[tokio::test]
    async fn test_set_replaces_whole_record() {
        let backend = MemoryBackend::new(Duration::from_secs(60), 10);
        let mut old = record("Old");
        old.formatted_address = Some("1 Main St".to_string());
        backend.set("place:P", &old).await.unwrap();

        backend.set("place:P", &record("New")).await.unwrap();

        let stored = backend.get("place:P").await.unwrap().unwrap();
        assert_eq!(stored.name.as_deref(), Some("New"));
        assert!(stored.formatted_address.is_none());
    }

    #[tokio::test]
    async fn test_delete() {
        let backend = MemoryBackend::new(Duration::from_secs(60), 10);
        backend.set("place:P", &record("N")).await.unwrap();

        assert!(backend.delete("place:P").await.unwrap());
        assert!(!backend.delete("place:P").await.unwrap());
        assert!(backend.get("place:P").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_entries_expire() {
        let backend = MemoryBackend::new(Duration::from_millis(50), 10);
        backend.set("place:P", &record("N")).await.unwrap();

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(backend.get("place:P").await.unwrap().is_none());
    }
}
