//! Typed cache over the raw byte store.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::search::QueryDescriptor;

use super::keys;
use super::store::{CacheLookup, CacheStore};

/// Cache-aside store for one entity kind, keyed by id or query fingerprint.
///
/// Writes are last-write-wins with the configured TTL and are best-effort:
/// a failed write is logged and swallowed. Reads never fail — whatever goes
/// wrong becomes a [`CacheLookup::Miss`]. Concurrent fills of the same key
/// may both run the expensive fallback and both write; that duplicate work
/// is accepted instead of a single-flight lock.
pub struct TypedCache<T> {
    store: Arc<dyn CacheStore>,
    namespace: &'static str,
    ttl: Duration,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for TypedCache<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            namespace: self.namespace,
            ttl: self.ttl,
            _entity: PhantomData,
        }
    }
}

impl<T> TypedCache<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(store: Arc<dyn CacheStore>, namespace: &'static str, ttl: Duration) -> Self {
        Self {
            store,
            namespace,
            ttl,
            _entity: PhantomData,
        }
    }

    pub async fn get_by_id(&self, id: &str) -> CacheLookup<T> {
        self.read(&keys::id_key(self.namespace, id)).await
    }

    pub async fn set_by_id(&self, id: &str, value: &T) {
        self.write(&keys::id_key(self.namespace, id), value).await;
    }

    pub async fn get_by_query(&self, descriptor: &QueryDescriptor) -> CacheLookup<Vec<T>> {
        self.read(&keys::query_key(self.namespace, descriptor)).await
    }

    pub async fn set_by_query(&self, descriptor: &QueryDescriptor, values: &[T]) {
        self.write(&keys::query_key(self.namespace, descriptor), &values)
            .await;
    }

    async fn read<V: DeserializeOwned>(&self, key: &str) -> CacheLookup<V> {
        let payload = match self.store.get(key).await {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                counter!("cinegate_cache_miss_total").increment(1);
                return CacheLookup::Miss;
            }
            Err(err) => {
                // Store outage: fall through to the engine and keep serving.
                counter!("cinegate_cache_miss_total").increment(1);
                warn!(target: "cinegate::cache", key, error = %err, "cache read failed, treating as miss");
                return CacheLookup::Miss;
            }
        };

        match serde_json::from_slice(&payload) {
            Ok(value) => {
                counter!("cinegate_cache_hit_total").increment(1);
                CacheLookup::Hit(value)
            }
            Err(err) => {
                // Corrupt or legacy payload; the entry will be overwritten
                // by the refill or expire on its own.
                counter!("cinegate_cache_miss_total").increment(1);
                warn!(target: "cinegate::cache", key, error = %err, "corrupt cache payload treated as miss");
                CacheLookup::Miss
            }
        }
    }

    async fn write<V: Serialize + ?Sized>(&self, key: &str, value: &V) {
        let payload = match serde_json::to_vec(value) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(target: "cinegate::cache", key, error = %err, "cache payload serialization failed");
                return;
            }
        };

        match self.store.set(key, &payload, self.ttl).await {
            Ok(()) => debug!(target: "cinegate::cache", key, bytes = payload.len(), "cache entry written"),
            Err(err) => {
                counter!("cinegate_cache_write_failure_total").increment(1);
                warn!(target: "cinegate::cache", key, error = %err, "best-effort cache write failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use serde::Deserialize;

    use super::*;
    use crate::cache::StoreError;
    use crate::search::descriptor::PageSpec;

    #[derive(Default)]
    struct MemoryStore {
        entries: Mutex<HashMap<String, Vec<u8>>>,
        offline: AtomicBool,
    }

    #[async_trait]
    impl CacheStore for MemoryStore {
        async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
            if self.offline.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable("store offline".to_string()));
            }
            Ok(self.entries.lock().expect("lock").get(key).cloned())
        }

        async fn set(&self, key: &str, value: &[u8], _ttl: Duration) -> Result<(), StoreError> {
            if self.offline.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable("store offline".to_string()));
            }
            self.entries
                .lock()
                .expect("lock")
                .insert(key.to_string(), value.to_vec());
            Ok(())
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Sample {
        id: String,
        title: String,
    }

    fn cache_over(store: Arc<MemoryStore>) -> TypedCache<Sample> {
        TypedCache::new(store, "sample", Duration::from_secs(300))
    }

    #[tokio::test]
    async fn id_roundtrip() {
        let store = Arc::new(MemoryStore::default());
        let cache = cache_over(store);

        assert!(!cache.get_by_id("s1").await.is_hit());
        assert_eq!(cache.get_by_id("s1").await.into_option(), None);

        let value = Sample {
            id: "s1".to_string(),
            title: "The Ring".to_string(),
        };
        cache.set_by_id("s1", &value).await;

        assert!(cache.get_by_id("s1").await.is_hit());
        assert_eq!(cache.get_by_id("s1").await.into_option(), Some(value));
    }

    #[tokio::test]
    async fn corrupt_payload_is_a_miss() {
        let store = Arc::new(MemoryStore::default());
        store
            .entries
            .lock()
            .expect("lock")
            .insert("sample:id:s1".to_string(), b"{not json".to_vec());

        let cache = cache_over(store);
        assert_eq!(cache.get_by_id("s1").await, CacheLookup::Miss);
    }

    #[tokio::test]
    async fn cached_empty_list_is_a_hit() {
        let store = Arc::new(MemoryStore::default());
        let cache = cache_over(store);
        let descriptor = QueryDescriptor::new(PageSpec::default()).with_text("nothing");

        assert_eq!(cache.get_by_query(&descriptor).await, CacheLookup::Miss);

        cache.set_by_query(&descriptor, &[]).await;

        assert_eq!(
            cache.get_by_query(&descriptor).await,
            CacheLookup::Hit(Vec::new())
        );
    }

    #[tokio::test]
    async fn offline_store_reads_as_miss_and_swallows_writes() {
        let store = Arc::new(MemoryStore::default());
        store.offline.store(true, Ordering::SeqCst);
        let cache = cache_over(store.clone());

        let value = Sample {
            id: "s1".to_string(),
            title: "The Ring".to_string(),
        };
        cache.set_by_id("s1", &value).await;
        assert_eq!(cache.get_by_id("s1").await, CacheLookup::Miss);

        store.offline.store(false, Ordering::SeqCst);
        assert!(store.entries.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn set_overwrites_unconditionally() {
        let store = Arc::new(MemoryStore::default());
        let cache = cache_over(store);

        let first = Sample {
            id: "s1".to_string(),
            title: "First".to_string(),
        };
        let second = Sample {
            id: "s1".to_string(),
            title: "Second".to_string(),
        };
        cache.set_by_id("s1", &first).await;
        cache.set_by_id("s1", &second).await;

        assert_eq!(cache.get_by_id("s1").await, CacheLookup::Hit(second));
    }
}
