//! Counting cache backend for handler and reconciler tests

use async_trait::async_trait;
use place_cache::{BackendKind, CacheBackend, CacheError, CacheRecord, MemoryBackend};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub struct RecordingBackend {
    inner: MemoryBackend,
    failing: bool,
    corrupt: bool,
    gets: AtomicUsize,
    sets: AtomicUsize,
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self {
            inner: MemoryBackend::new(Duration::from_secs(3600), 100),
            failing: false,
            corrupt: false,
            gets: AtomicUsize::new(0),
            sets: AtomicUsize::new(0),
        }
    }
}

impl RecordingBackend {
    /// Every get/set/delete errors
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Every stored entry reads back as undecodable text
    pub fn corrupt() -> Self {
        Self {
            corrupt: true,
            ..Self::default()
        }
    }

    pub async fn seed(&self, key: &str, record: &CacheRecord) {
        self.inner.set(key, record).await.unwrap();
    }

    pub async fn stored(&self, key: &str) -> Option<CacheRecord> {
        self.inner.get(key).await.unwrap()
    }

    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn sets(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CacheBackend for RecordingBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Memory
    }

    async fn get(&self, key: &str) -> place_cache::Result<Option<CacheRecord>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(CacheError::Timeout("get"));
        }
        if self.corrupt {
            let garbled = serde_json::from_str::<CacheRecord>("{\"name\":").unwrap_err();
            return Err(CacheError::Serialization(garbled));
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, record: &CacheRecord) -> place_cache::Result<()> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(CacheError::Closed);
        }
        self.inner.set(key, record).await
    }

    async fn delete(&self, key: &str) -> place_cache::Result<bool> {
        if self.failing {
            return Err(CacheError::Closed);
        }
        self.inner.delete(key).await
    }
}
