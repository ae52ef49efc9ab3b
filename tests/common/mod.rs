#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use cinegate::cache::{CacheStore, StoreError};
use cinegate::search::{EngineError, RawDocument, SearchEngineClient, SearchResult};

/// In-memory cache store. TTLs are accepted and ignored; tests exercise
/// presence, not expiry. Flipping `offline` makes every call fail the way a
/// dropped Redis connection would.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn seed(&self, key: &str, value: &[u8]) {
        self.entries
            .lock()
            .expect("store lock")
            .insert(key.to_string(), value.to_vec());
    }

    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.lock().expect("store lock").get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("store lock").len()
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.check_online()?;
        Ok(self.entries.lock().expect("store lock").get(key).cloned())
    }

    async fn set(&self, key: &str, value: &[u8], _ttl: Duration) -> Result<(), StoreError> {
        self.check_online()?;
        self.entries
            .lock()
            .expect("store lock")
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

/// Scripted search engine. Documents are keyed by `(index, id)`; searches
/// return whatever `search_hits` holds regardless of the query body. Call
/// counters let tests assert how often the fallback path actually ran.
#[derive(Default)]
pub struct MockEngine {
    documents: Mutex<HashMap<(String, String), Value>>,
    search_hits: Mutex<Vec<RawDocument>>,
    pub get_calls: AtomicUsize,
    pub multi_get_calls: AtomicUsize,
    pub execute_calls: AtomicUsize,
    multi_get_requests: Mutex<Vec<Vec<String>>>,
}

impl MockEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn put_document(&self, index: &str, id: &str, source: Value) {
        self.documents
            .lock()
            .expect("engine lock")
            .insert((index.to_string(), id.to_string()), source);
    }

    pub fn set_search_hits(&self, hits: Vec<RawDocument>) {
        *self.search_hits.lock().expect("engine lock") = hits;
    }

    pub fn multi_get_requests(&self) -> Vec<Vec<String>> {
        self.multi_get_requests.lock().expect("engine lock").clone()
    }
}

#[async_trait]
impl SearchEngineClient for MockEngine {
    async fn get_by_id(&self, index: &str, id: &str) -> Result<RawDocument, EngineError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        let documents = self.documents.lock().expect("engine lock");
        match documents.get(&(index.to_string(), id.to_string())) {
            Some(source) => Ok(RawDocument {
                id: id.to_string(),
                source: source.clone(),
            }),
            None => Err(EngineError::NotFound),
        }
    }

    async fn multi_get(
        &self,
        index: &str,
        ids: &[String],
    ) -> Result<Vec<RawDocument>, EngineError> {
        self.multi_get_calls.fetch_add(1, Ordering::SeqCst);
        self.multi_get_requests
            .lock()
            .expect("engine lock")
            .push(ids.to_vec());
        let documents = self.documents.lock().expect("engine lock");
        Ok(ids
            .iter()
            .filter_map(|id| {
                documents
                    .get(&(index.to_string(), id.clone()))
                    .map(|source| RawDocument {
                        id: id.clone(),
                        source: source.clone(),
                    })
            })
            .collect())
    }

    async fn execute_query(&self, _index: &str, _query: &Value) -> Result<SearchResult, EngineError> {
        self.execute_calls.fetch_add(1, Ordering::SeqCst);
        let hits = self.search_hits.lock().expect("engine lock").clone();
        Ok(SearchResult {
            total: hits.len() as u64,
            hits,
        })
    }
}

pub fn film_source(id: &str, title: &str, rating: f64) -> Value {
    json!({
        "id": id,
        "title": title,
        "imdb_rating": rating,
        "description": "test film",
        "genres_names": ["Drama"],
        "actors_names": ["Ann Actor"],
        "writers_names": [],
        "directors_names": ["Dirk Director"],
        "genres": [{"id": "g1", "name": "Drama"}],
        "actors": [{"id": "p1", "name": "Ann Actor"}],
        "writers": [],
        "directors": [{"id": "p2", "name": "Dirk Director"}]
    })
}

pub fn genre_source(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "filmworks": [
            {"id": "f1", "title": "First", "imdb_rating": 7.0}
        ]
    })
}

pub fn person_source(id: &str, full_name: &str, film_ids: &[&str]) -> Value {
    json!({
        "id": id,
        "full_name": full_name,
        "roles": ["actor"],
        "film_ids": film_ids
    })
}

pub fn film_hit(id: &str, title: &str, rating: f64) -> RawDocument {
    RawDocument {
        id: id.to_string(),
        source: film_source(id, title, rating),
    }
}
