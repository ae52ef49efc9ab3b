//! Raw cache store boundary.
//!
//! The backing store is an opaque key/value service with TTL: `GET` and
//! `SET key value TTL` are the only operations the gateway needs — no
//! delete, no increment, no scans.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cache store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), StoreError>;
}

/// Outcome of a typed cache probe.
///
/// Absent keys, corrupt payloads and store outages all collapse to `Miss`;
/// the caller falls through to the source of truth without distinguishing
/// why. A cached empty list deserializes to `Hit(vec![])`, so "cached
/// nothing" and "never cached" stay distinct states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup<T> {
    Hit(T),
    Miss,
}

impl<T> CacheLookup<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Hit(value) => Some(value),
            Self::Miss => None,
        }
    }

    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit(_))
    }
}
