//! Engine-agnostic query model and the search engine boundary.

pub mod compile;
pub mod descriptor;
pub mod engine;

pub use compile::SearchProfile;
pub use descriptor::{DescriptorError, FilterClause, PageSpec, QueryDescriptor, SortSpec};
pub use engine::{EngineError, RawDocument, SearchEngineClient, SearchResult};
