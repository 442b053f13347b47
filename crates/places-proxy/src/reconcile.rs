//! Place-details reconciliation: cache read, satisfaction check, upstream
//! refresh, full-record store, projection.

use crate::error::DetailsError;
use crate::types::{CacheStats, DetailsQuery};
use place_cache::{missing_fields, project, CacheBackend, CacheRecord, FieldSpec};
use places_api::{DetailsOutcome, PlacesClient};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Answer produced for a valid place-details request
#[derive(Debug)]
pub struct Lookup {
    pub body: Value,
    pub from_cache: bool,
}

pub struct Reconciler {
    cache: Arc<dyn CacheBackend>,
    upstream: PlacesClient,
    fetch_full_record: bool,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Reconciler {
    pub fn new(cache: Arc<dyn CacheBackend>, upstream: PlacesClient, fetch_full_record: bool) -> Self {
        Self {
            cache,
            upstream,
            fetch_full_record,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            backend: self.cache.kind(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Release the cache backend's connections
    pub async fn close(&self) {
        self.cache.close().await;
    }

    pub async fn lookup(&self, query: &DetailsQuery) -> Result<Lookup, DetailsError> {
        let (Some(place_id), Some(key)) = (non_empty(&query.place_id), non_empty(&query.key))
        else {
            debug!("Missing place_id or key in request");
            return Err(DetailsError::Validation);
        };

        let requested = match query.fields.as_deref().map(FieldSpec::parse_list) {
            Some(list) if !list.is_empty() => list,
            _ => FieldSpec::canonical(),
        };

        let cache_key = CacheRecord::cache_key(place_id);
        let cached = self.read_cache(&cache_key).await;
        let missing = missing_fields(cached.as_ref(), &requested);

        if let Some(record) = cached.as_ref().filter(|_| missing.is_empty()) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(place_id, "All requested fields found in cache");
            return Ok(Lookup {
                body: Value::Object(project(record, &requested)),
                from_cache: true,
            });
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        info!(
            place_id,
            cached = cached.is_some(),
            missing = %join(&missing),
            "Cache miss"
        );

        let fetch = self.upstream_fields(&requested);
        let place = match self
            .upstream
            .place_details(place_id, &fetch, key)
            .await
            .map_err(DetailsError::Transport)?
        {
            DetailsOutcome::Found(place) => place,
            DetailsOutcome::Rejected(body) => return Err(DetailsError::UpstreamRejection(body)),
        };

        let record = CacheRecord::from(place);
        if let Err(e) = self.cache.set(&cache_key, &record).await {
            warn!(place_id, error = %e, "Failed to store place in cache");
        }

        Ok(Lookup {
            body: Value::Object(project(&record, &requested)),
            from_cache: false,
        })
    }

    async fn read_cache(&self, key: &str) -> Option<CacheRecord> {
        match self.cache.get(key).await {
            Ok(record) => record,
            Err(e) => {
                warn!(key, error = %e, "Error retrieving data from cache");
                None
            }
        }
    }

    /// Fields to request upstream: the caller's list, widened to the canonical
    /// set when full-record fetching is on
    fn upstream_fields(&self, requested: &[FieldSpec]) -> Vec<String> {
        let mut fields: Vec<String> = requested.iter().map(|f| f.as_str().to_string()).collect();

        if self.fetch_full_record {
            for spec in FieldSpec::canonical() {
                if !requested.contains(&spec) {
                    fields.push(spec.as_str().to_string());
                }
            }
        }

        fields
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn join(specs: &[FieldSpec]) -> String {
    specs.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(",")
}
