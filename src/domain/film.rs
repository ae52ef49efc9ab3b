//! Film records as stored in the `movies` index.

use serde::{Deserialize, Serialize};

use super::CatalogEntity;
use crate::search::compile::SearchProfile;
use crate::search::descriptor::FilterClause;

/// Full-text fields and boosts mirror the index mapping: cast and title
/// matches rank above description and genre name matches.
pub const FILM_SEARCH: SearchProfile = SearchProfile {
    index: "movies",
    text_fields: &[
        "title^4",
        "description^3",
        "genres_names^2",
        "actors_names^4",
        "writers_names",
        "directors_names^3",
    ],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdName {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Film {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub imdb_rating: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub actors_names: Vec<String>,
    #[serde(default)]
    pub writers_names: Vec<String>,
    #[serde(default)]
    pub directors_names: Vec<String>,
    #[serde(default)]
    pub genres_names: Vec<String>,
    #[serde(default)]
    pub actors: Vec<IdName>,
    #[serde(default)]
    pub writers: Vec<IdName>,
    #[serde(default)]
    pub directors: Vec<IdName>,
    #[serde(default)]
    pub genres: Vec<IdName>,
}

impl Film {
    /// Filter films by genre. Genres are indexed as nested sub-documents, so
    /// the clause carries the nested path.
    pub fn genre_filter(genre_id: impl Into<String>) -> FilterClause {
        FilterClause::nested("genres", "genres.id", genre_id)
    }
}

impl CatalogEntity for Film {
    const KIND: &'static str = "film";

    fn id(&self) -> &str {
        &self.id
    }
}
