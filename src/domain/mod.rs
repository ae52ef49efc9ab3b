//! Catalog entities.
//!
//! Value objects: constructed only by deserializing a cache payload or an
//! engine document, never mutated afterwards. The cache/service core is
//! generic over [`CatalogEntity`] and inspects nothing beyond the id.

mod film;
mod genre;
mod person;

pub use film::{FILM_SEARCH, Film, IdName};
pub use genre::{FilmRef, GENRE_SEARCH, Genre};
pub use person::{PERSON_SEARCH, Person};

use serde::Serialize;
use serde::de::DeserializeOwned;

pub trait CatalogEntity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Cache namespace for this entity kind.
    const KIND: &'static str;

    fn id(&self) -> &str;
}
