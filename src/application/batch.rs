//! Bulk id resolution with partial cache hits.

use std::sync::Arc;

use futures::future;
use tracing::debug;

use crate::cache::{CacheLookup, TypedCache};
use crate::domain::CatalogEntity;
use crate::search::engine::SearchEngineClient;

use super::catalog::decode_document;
use super::error::CatalogError;

/// Resolves a list of ids by splitting it into cache hits and misses,
/// multi-fetching the misses in one engine call and repopulating the cache
/// off the critical path.
///
/// Ids that exist nowhere are dropped, so the result may be shorter than the
/// input but never longer. Result order is unspecified; callers that need
/// the input order must re-sort by id.
pub struct BatchResolver<T> {
    cache: TypedCache<T>,
    engine: Arc<dyn SearchEngineClient>,
    index: &'static str,
}

impl<T: CatalogEntity> BatchResolver<T> {
    pub fn new(
        cache: TypedCache<T>,
        engine: Arc<dyn SearchEngineClient>,
        index: &'static str,
    ) -> Self {
        Self {
            cache,
            engine,
            index,
        }
    }

    pub async fn resolve_many(&self, ids: &[String]) -> Result<Vec<T>, CatalogError> {
        // Per-id probes are independent and latency-bound; issue them all at
        // once instead of walking the list sequentially.
        let lookups = future::join_all(ids.iter().map(|id| self.cache.get_by_id(id))).await;

        let mut resolved = Vec::with_capacity(ids.len());
        let mut missing = Vec::new();
        for (id, lookup) in ids.iter().zip(lookups) {
            match lookup {
                CacheLookup::Hit(entity) => resolved.push(entity),
                CacheLookup::Miss => missing.push(id.clone()),
            }
        }

        if missing.is_empty() {
            return Ok(resolved);
        }

        debug!(
            target: "cinegate::catalog",
            index = self.index,
            hits = resolved.len(),
            misses = missing.len(),
            "multi-fetching cache misses"
        );
        let documents = self
            .engine
            .multi_get(self.index, &missing)
            .await
            .map_err(CatalogError::Engine)?;

        for document in documents {
            let entity = decode_document::<T>(document)?;
            // Repopulation is fire-and-forget: a dropped write only costs a
            // future miss, and the write is idempotent.
            let cache = self.cache.clone();
            let stored = entity.clone();
            tokio::spawn(async move {
                cache.set_by_id(stored.id(), &stored).await;
            });
            resolved.push(entity);
        }

        Ok(resolved)
    }
}
