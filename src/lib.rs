//! Cinegate: a read-only query gateway over a film-catalog search engine.
//!
//! The catalog lives in a document search engine (Elasticsearch semantics)
//! that is rebuilt out-of-band; this service only reads. A cache-aside layer
//! (Redis semantics) sits in front of the engine and absorbs repeated
//! identical lookups and searches. Entities — films, genres, persons — share
//! one generic service core parameterized by a per-entity search profile.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
pub mod search;
