//! Genre records as stored in the `genres` index.

use serde::{Deserialize, Serialize};

use super::CatalogEntity;
use crate::search::compile::SearchProfile;

pub const GENRE_SEARCH: SearchProfile = SearchProfile {
    index: "genres",
    text_fields: &["name"],
};

/// Short film reference embedded in a genre document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilmRef {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub imdb_rating: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub filmworks: Vec<FilmRef>,
}

impl CatalogEntity for Genre {
    const KIND: &'static str = "genre";

    fn id(&self) -> &str {
        &self.id
    }
}
