//! Search engine boundary.
//!
//! The engine is an external collaborator with document-store semantics: get
//! one document, multi-get a batch, or run a compiled query. Everything else
//! about it (query DSL, transport, cluster topology) stays behind this trait.

use std::fmt::Display;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The requested document does not exist. Callers normalize this to an
    /// absent result; it never escapes the application layer as an error.
    #[error("document not found")]
    NotFound,
    /// The engine rejected the compiled query — an invalid sort field, a
    /// malformed clause. Indicates a caller or translation bug and is
    /// propagated as a hard failure.
    #[error("query rejected by engine: {0}")]
    Query(String),
    #[error("engine transport failure: {0}")]
    Transport(String),
}

impl EngineError {
    pub fn query(reason: impl Display) -> Self {
        Self::Query(reason.to_string())
    }

    pub fn transport(reason: impl Display) -> Self {
        Self::Transport(reason.to_string())
    }
}

/// One engine document: its id plus the stored source body, still untyped.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub id: String,
    pub source: serde_json::Value,
}

#[derive(Debug, Clone)]
pub struct SearchResult {
    pub hits: Vec<RawDocument>,
    pub total: u64,
}

#[async_trait]
pub trait SearchEngineClient: Send + Sync {
    /// Fetch one document. Fails with [`EngineError::NotFound`] when absent.
    async fn get_by_id(&self, index: &str, id: &str) -> Result<RawDocument, EngineError>;

    /// Fetch the subset of `ids` that exist. Missing ids are silently
    /// omitted and the returned order is unspecified; callers must re-key by
    /// document id, not by position.
    async fn multi_get(&self, index: &str, ids: &[String])
    -> Result<Vec<RawDocument>, EngineError>;

    /// Execute a compiled query against `index`.
    async fn execute_query(
        &self,
        index: &str,
        query: &serde_json::Value,
    ) -> Result<SearchResult, EngineError>;
}
