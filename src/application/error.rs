use thiserror::Error;

use crate::config::LoadError;
use crate::infra::error::InfraError;
use crate::search::EngineError;

/// Failures surfaced by the catalog services.
///
/// Absence of data is not represented here: missing entities come back as
/// `None` or an empty list, and the edge layer decides what that means.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Engine(EngineError),
    /// An engine document did not match the entity schema. Unlike a corrupt
    /// cache payload this points at a data-contract bug, so it propagates.
    #[error("malformed `{kind}` document `{id}`: {reason}")]
    Document {
        kind: &'static str,
        id: String,
        reason: String,
    },
}

/// Top-level process error for the binary entrypoint.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] LoadError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("server error: {0}")]
    Server(String),
}
