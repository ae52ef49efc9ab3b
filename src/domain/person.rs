//! Person records as stored in the `persons` index.

use serde::{Deserialize, Serialize};

use super::CatalogEntity;
use crate::search::compile::SearchProfile;

pub const PERSON_SEARCH: SearchProfile = SearchProfile {
    index: "persons",
    text_fields: &["full_name"],
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    pub full_name: String,
    #[serde(default)]
    pub roles: Vec<String>,
    /// Films this person worked on; resolved in bulk via the batch resolver.
    #[serde(default)]
    pub film_ids: Vec<String>,
}

impl CatalogEntity for Person {
    const KIND: &'static str = "person";

    fn id(&self) -> &str {
        &self.id
    }
}
