//! Redis-backed cache store.

use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};

use crate::cache::{CacheStore, StoreError};

use super::error::InfraError;

/// Cache store over a Redis connection manager.
///
/// The manager reconnects on its own; individual command failures during an
/// outage surface as [`StoreError::Unavailable`] and are absorbed by the
/// typed cache layer.
pub struct RedisStore {
    connection: ConnectionManager,
}

impl RedisStore {
    pub async fn connect(url: &str) -> Result<Self, InfraError> {
        let client = Client::open(url)
            .map_err(|err| InfraError::cache(format!("invalid cache url `{url}`: {err}")))?;
        let connection = ConnectionManager::new(client)
            .await
            .map_err(|err| InfraError::cache(format!("cache connection failed: {err}")))?;
        Ok(Self { connection })
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let mut connection = self.connection.clone();
        connection
            .get::<_, Option<Vec<u8>>>(key)
            .await
            .map_err(|err| StoreError::Unavailable(err.to_string()))
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), StoreError> {
        let mut connection = self.connection.clone();
        connection
            .set_ex::<_, _, ()>(key, value, ttl.as_secs())
            .await
            .map_err(|err| StoreError::Unavailable(err.to_string()))
    }
}
