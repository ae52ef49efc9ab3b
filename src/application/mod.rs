//! Application services: the cache-aside read path for catalog entities.

pub mod batch;
pub mod catalog;
pub mod error;

pub use batch::BatchResolver;
pub use catalog::CatalogService;
pub use error::{AppError, CatalogError};
