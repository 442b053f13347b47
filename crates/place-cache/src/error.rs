//! Error types for cache backends

use std::fmt;

#[derive(Debug)]
pub enum CacheError {
    /// Redis command or connection failure
    Redis(redis::RedisError),
    /// Stored text could not be (de)serialized as a record
    Serialization(serde_json::Error),
    /// Operation did not finish within its bound
    Timeout(&'static str),
    /// Backend was closed during shutdown
    Closed,
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Redis(e) => write!(f, "Redis error: {}", e),
            Self::Serialization(e) => write!(f, "Cache serialization error: {}", e),
            Self::Timeout(op) => write!(f, "Cache {} timed out", op),
            Self::Closed => write!(f, "Cache backend is closed"),
        }
    }
}

impl std::error::Error for CacheError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Redis(e) => Some(e),
            Self::Serialization(e) => Some(e),
            _ => None,
        }
    }
}

impl From<redis::RedisError> for CacheError {
    fn from(e: redis::RedisError) -> Self {
        Self::Redis(e)
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e)
    }
}

pub type Result<T> = std::result::Result<T, CacheError>;
