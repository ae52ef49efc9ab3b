//! Cache-aside layer.
//!
//! Entries are keyed by entity id or by a normalized query fingerprint and
//! are only ever created or left to expire — there is no invalidation path,
//! because the underlying catalog is rebuilt out-of-band. The cache is an
//! optimization, never a correctness dependency: every failure mode on the
//! read path collapses to a miss and every write is best-effort.

pub mod keys;
mod store;
mod typed;

pub use store::{CacheLookup, CacheStore, StoreError};
pub use typed::TypedCache;
