//! HTTP edge layer.
//!
//! Thin translation between the catalog services and the wire: query
//! parameters become descriptors, absence becomes 404 (a search that matches
//! nothing included), validation failures become 400 and engine trouble
//! becomes 502. View schemas are distinct from the stored entities so the
//! API only exposes what each endpoint needs.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::application::catalog::CatalogService;
use crate::application::error::CatalogError;
use crate::domain::{Film, Genre, IdName, Person};
use crate::search::descriptor::{
    DescriptorError, FilterClause, PageSpec, QueryDescriptor, SortSpec,
};
use crate::search::engine::EngineError;

#[derive(Clone)]
pub struct GatewayState {
    pub films: Arc<CatalogService<Film>>,
    pub genres: Arc<CatalogService<Genre>>,
    pub persons: Arc<CatalogService<Person>>,
}

pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/v1/films", get(search_films))
        .route("/v1/films/{id}", get(film_details))
        .route("/v1/genres", get(search_genres))
        .route("/v1/genres/{id}", get(genre_details))
        .route("/v1/persons", get(search_persons))
        .route("/v1/persons/{id}", get(person_details))
        .route("/v1/persons/{id}/films", get(person_films))
        .with_state(state)
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub enum ApiError {
    NotFound(&'static str),
    Validation(String),
    BadQuery(String),
    Upstream(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            Self::NotFound(detail) => (StatusCode::NOT_FOUND, detail.to_string()),
            Self::Validation(detail) => (StatusCode::BAD_REQUEST, detail),
            Self::BadQuery(detail) => (StatusCode::BAD_REQUEST, detail),
            Self::Upstream(detail) => {
                error!(target: "cinegate::http", detail, "upstream failure");
                (
                    StatusCode::BAD_GATEWAY,
                    "catalog temporarily unavailable".to_string(),
                )
            }
        };
        (status, Json(ErrorBody { detail })).into_response()
    }
}

impl From<DescriptorError> for ApiError {
    fn from(err: DescriptorError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Engine(EngineError::Query(reason)) => Self::BadQuery(reason),
            CatalogError::Engine(other) => Self::Upstream(other.to_string()),
            document @ CatalogError::Document { .. } => Self::Upstream(document.to_string()),
        }
    }
}

// ============================================================================
// Query parameters
// ============================================================================

fn default_page_number() -> u32 {
    1
}

fn default_page_size() -> u32 {
    PageSpec::DEFAULT_SIZE
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    #[serde(default)]
    query: Option<String>,
    #[serde(default)]
    sort: Option<String>,
    #[serde(default = "default_page_number")]
    page_number: u32,
    #[serde(default = "default_page_size")]
    page_size: u32,
}

impl SearchParams {
    fn into_descriptor(self, filter: Option<FilterClause>) -> Result<QueryDescriptor, ApiError> {
        let page = PageSpec::new(self.page_number, self.page_size)?;
        let mut descriptor = QueryDescriptor::new(page);
        if let Some(query) = self.query {
            descriptor = descriptor.with_text(query);
        }
        if let Some(filter) = filter {
            descriptor = descriptor.with_filter(filter);
        }
        if let Some(sort) = self.sort.as_deref().and_then(SortSpec::parse) {
            descriptor = descriptor.with_sort(sort);
        }
        Ok(descriptor)
    }
}

// Not flattened into `SearchParams`: urlencoded deserialization routes
// flattened numeric fields through `deserialize_any` and rejects them.
#[derive(Debug, Deserialize)]
struct FilmSearchParams {
    #[serde(default)]
    genre: Option<String>,
    #[serde(default)]
    query: Option<String>,
    #[serde(default)]
    sort: Option<String>,
    #[serde(default = "default_page_number")]
    page_number: u32,
    #[serde(default = "default_page_size")]
    page_size: u32,
}

impl FilmSearchParams {
    fn split(self) -> (Option<String>, SearchParams) {
        (
            self.genre,
            SearchParams {
                query: self.query,
                sort: self.sort,
                page_number: self.page_number,
                page_size: self.page_size,
            },
        )
    }
}

// ============================================================================
// Views
// ============================================================================

#[derive(Debug, Serialize)]
pub struct FilmShortView {
    pub uuid: String,
    pub title: String,
    pub imdb_rating: Option<f64>,
}

impl From<Film> for FilmShortView {
    fn from(film: Film) -> Self {
        Self {
            uuid: film.id,
            title: film.title,
            imdb_rating: film.imdb_rating,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GenreRefView {
    pub uuid: String,
    pub name: String,
}

impl From<IdName> for GenreRefView {
    fn from(genre: IdName) -> Self {
        Self {
            uuid: genre.id,
            name: genre.name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PersonRefView {
    pub uuid: String,
    pub full_name: String,
}

impl From<IdName> for PersonRefView {
    fn from(person: IdName) -> Self {
        Self {
            uuid: person.id,
            full_name: person.name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FilmDetailsView {
    pub uuid: String,
    pub title: String,
    pub imdb_rating: Option<f64>,
    pub description: Option<String>,
    pub genre: Vec<GenreRefView>,
    pub actors: Vec<PersonRefView>,
    pub writers: Vec<PersonRefView>,
    pub directors: Vec<PersonRefView>,
}

impl From<Film> for FilmDetailsView {
    fn from(film: Film) -> Self {
        Self {
            uuid: film.id,
            title: film.title,
            imdb_rating: film.imdb_rating,
            description: film.description,
            genre: film.genres.into_iter().map(GenreRefView::from).collect(),
            actors: film.actors.into_iter().map(PersonRefView::from).collect(),
            writers: film.writers.into_iter().map(PersonRefView::from).collect(),
            directors: film
                .directors
                .into_iter()
                .map(PersonRefView::from)
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GenreView {
    pub uuid: String,
    pub name: String,
    pub filmworks: Vec<FilmShortView>,
}

impl From<Genre> for GenreView {
    fn from(genre: Genre) -> Self {
        Self {
            uuid: genre.id,
            name: genre.name,
            filmworks: genre
                .filmworks
                .into_iter()
                .map(|film| FilmShortView {
                    uuid: film.id,
                    title: film.title,
                    imdb_rating: film.imdb_rating,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PersonView {
    pub uuid: String,
    pub full_name: String,
    pub roles: Vec<String>,
    pub film_ids: Vec<String>,
}

impl From<Person> for PersonView {
    fn from(person: Person) -> Self {
        Self {
            uuid: person.id,
            full_name: person.full_name,
            roles: person.roles,
            film_ids: person.film_ids,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

async fn film_details(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Result<Json<FilmDetailsView>, ApiError> {
    let film = state.films.get_by_id(&id).await?;
    let film = film.ok_or(ApiError::NotFound("film not found"))?;
    Ok(Json(FilmDetailsView::from(film)))
}

async fn search_films(
    State(state): State<GatewayState>,
    Query(params): Query<FilmSearchParams>,
) -> Result<Json<Vec<FilmShortView>>, ApiError> {
    let (genre, params) = params.split();
    let descriptor = params.into_descriptor(genre.map(Film::genre_filter))?;
    let films = state.films.search(&descriptor).await?;
    if films.is_empty() {
        return Err(ApiError::NotFound("films not found"));
    }
    Ok(Json(films.into_iter().map(FilmShortView::from).collect()))
}

async fn genre_details(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Result<Json<GenreView>, ApiError> {
    let genre = state.genres.get_by_id(&id).await?;
    let genre = genre.ok_or(ApiError::NotFound("genre not found"))?;
    Ok(Json(GenreView::from(genre)))
}

async fn search_genres(
    State(state): State<GatewayState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<GenreView>>, ApiError> {
    let descriptor = params.into_descriptor(None)?;
    let genres = state.genres.search(&descriptor).await?;
    if genres.is_empty() {
        return Err(ApiError::NotFound("genres not found"));
    }
    Ok(Json(genres.into_iter().map(GenreView::from).collect()))
}

async fn person_details(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Result<Json<PersonView>, ApiError> {
    let person = state.persons.get_by_id(&id).await?;
    let person = person.ok_or(ApiError::NotFound("person not found"))?;
    Ok(Json(PersonView::from(person)))
}

async fn search_persons(
    State(state): State<GatewayState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<PersonView>>, ApiError> {
    let descriptor = params.into_descriptor(None)?;
    let persons = state.persons.search(&descriptor).await?;
    if persons.is_empty() {
        return Err(ApiError::NotFound("persons not found"));
    }
    Ok(Json(persons.into_iter().map(PersonView::from).collect()))
}

/// Films a person worked on, resolved in bulk from `film_ids`. Batch
/// resolution gives no ordering guarantee, so the view is sorted by title
/// before leaving the edge.
async fn person_films(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<FilmShortView>>, ApiError> {
    let person = state.persons.get_by_id(&id).await?;
    let person = person.ok_or(ApiError::NotFound("person not found"))?;
    let films = state.films.resolve_many(&person.film_ids).await?;
    if films.is_empty() {
        return Err(ApiError::NotFound("films not found"));
    }
    let mut views: Vec<FilmShortView> = films.into_iter().map(FilmShortView::from).collect();
    views.sort_by(|a, b| a.title.cmp(&b.title));
    Ok(Json(views))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn film_details_view_projects_embedded_refs() {
        let film = Film {
            id: "f1".to_string(),
            title: "The Ring".to_string(),
            imdb_rating: Some(7.1),
            description: Some("A cursed tape.".to_string()),
            actors_names: vec!["Naomi Watts".to_string()],
            writers_names: Vec::new(),
            directors_names: Vec::new(),
            genres_names: vec!["Horror".to_string()],
            actors: vec![IdName {
                id: "p1".to_string(),
                name: "Naomi Watts".to_string(),
            }],
            writers: Vec::new(),
            directors: Vec::new(),
            genres: vec![IdName {
                id: "g1".to_string(),
                name: "Horror".to_string(),
            }],
        };

        let view = FilmDetailsView::from(film);
        assert_eq!(view.uuid, "f1");
        assert_eq!(view.genre[0].name, "Horror");
        assert_eq!(view.actors[0].full_name, "Naomi Watts");
    }

    #[test]
    fn catalog_query_error_maps_to_bad_request() {
        let err = ApiError::from(CatalogError::Engine(EngineError::Query(
            "unknown sort field".to_string(),
        )));
        assert!(matches!(err, ApiError::BadQuery(_)));
    }

    #[test]
    fn catalog_transport_error_maps_to_upstream() {
        let err = ApiError::from(CatalogError::Engine(EngineError::Transport(
            "connection refused".to_string(),
        )));
        assert!(matches!(err, ApiError::Upstream(_)));
    }
}
