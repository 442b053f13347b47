//! Field-aware partial cache for place records
//!
//! A place is cached once per identifier in a fixed shape ([`CacheRecord`]).
//! Requests name the fields they want; [`missing_fields`] decides whether the
//! cached record can answer them and [`project`] cuts the record down to
//! exactly those fields. Storage is behind [`CacheBackend`], with an
//! in-process moka store and a Redis store chosen once at startup by
//! [`select_backend`].

mod backend;
mod error;
mod fields;
mod memory;
mod record;
mod redis_store;

pub use backend::{select_backend, with_fallback, BackendKind, CacheBackend, CacheSettings};
pub use error::{CacheError, Result};
pub use fields::{missing_fields, project, FieldSpec, GeometryPart, RecordField};
pub use memory::MemoryBackend;
pub use record::{CacheRecord, Geometry};
pub use redis_store::RedisBackend;
