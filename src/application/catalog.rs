//! Generic cache-aside catalog service.
//!
//! One service type covers every entity kind; what varies per entity is the
//! injected [`SearchProfile`] and the type parameter. There is no shared
//! mutable state between requests — the cache and engine handles are
//! stateless routers to external systems — and no locks anywhere on this
//! path: entries are immutable once written and duplicate concurrent fills
//! are tolerated.

use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use tracing::debug;

use crate::cache::{CacheLookup, CacheStore, TypedCache};
use crate::domain::CatalogEntity;
use crate::search::compile::{self, SearchProfile};
use crate::search::descriptor::QueryDescriptor;
use crate::search::engine::{EngineError, RawDocument, SearchEngineClient};

use super::batch::BatchResolver;
use super::error::CatalogError;

pub struct CatalogService<T> {
    cache: TypedCache<T>,
    engine: Arc<dyn SearchEngineClient>,
    profile: SearchProfile,
    batch: BatchResolver<T>,
}

impl<T: CatalogEntity> CatalogService<T> {
    pub fn new(
        profile: SearchProfile,
        store: Arc<dyn CacheStore>,
        engine: Arc<dyn SearchEngineClient>,
        ttl: Duration,
    ) -> Self {
        let cache = TypedCache::new(store, T::KIND, ttl);
        let batch = BatchResolver::new(cache.clone(), engine.clone(), profile.index);
        Self {
            cache,
            engine,
            profile,
            batch,
        }
    }

    /// Resolve one entity by id: cache first, engine on miss, refill after.
    ///
    /// Absent documents return `None` and are not cached, so a later
    /// out-of-band rebuild that adds the document becomes visible at once.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<T>, CatalogError> {
        if let CacheLookup::Hit(entity) = self.cache.get_by_id(id).await {
            return Ok(Some(entity));
        }

        counter!("cinegate_engine_fallback_total").increment(1);
        let document = match self.engine.get_by_id(self.profile.index, id).await {
            Ok(document) => document,
            Err(EngineError::NotFound) => return Ok(None),
            Err(err) => return Err(CatalogError::Engine(err)),
        };
        debug!(target: "cinegate::catalog", kind = T::KIND, id, "fetched entity from engine");

        let entity = decode_document::<T>(document)?;
        self.cache.set_by_id(id, &entity).await;
        Ok(Some(entity))
    }

    /// Run a structured search: cache first, engine on miss, refill after.
    ///
    /// Empty results are cached too — a query known to match nothing would
    /// otherwise re-run a full scan on every repeat. The entry shares the
    /// regular TTL, so stale emptiness heals itself.
    pub async fn search(&self, descriptor: &QueryDescriptor) -> Result<Vec<T>, CatalogError> {
        if let CacheLookup::Hit(entities) = self.cache.get_by_query(descriptor).await {
            return Ok(entities);
        }

        counter!("cinegate_engine_fallback_total").increment(1);
        let compiled = compile::compile(&self.profile, descriptor);
        let result = self
            .engine
            .execute_query(self.profile.index, &compiled)
            .await
            .map_err(CatalogError::Engine)?;
        debug!(
            target: "cinegate::catalog",
            kind = T::KIND,
            hits = result.hits.len(),
            total = result.total,
            "search executed on engine"
        );

        let entities = result
            .hits
            .into_iter()
            .map(decode_document::<T>)
            .collect::<Result<Vec<_>, _>>()?;
        self.cache.set_by_query(descriptor, &entities).await;
        Ok(entities)
    }

    /// Resolve a batch of ids; see [`BatchResolver`] for the semantics.
    pub async fn resolve_many(&self, ids: &[String]) -> Result<Vec<T>, CatalogError> {
        self.batch.resolve_many(ids).await
    }
}

pub(crate) fn decode_document<T: CatalogEntity>(document: RawDocument) -> Result<T, CatalogError> {
    let RawDocument { id, source } = document;
    serde_json::from_value(source).map_err(|err| CatalogError::Document {
        kind: T::KIND,
        id,
        reason: err.to_string(),
    })
}
