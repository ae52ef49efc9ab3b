//! Elasticsearch REST adapter for the search engine boundary.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use url::Url;

use crate::search::engine::{EngineError, RawDocument, SearchEngineClient, SearchResult};

use super::error::InfraError;

pub struct ElasticClient {
    http: Client,
    base: Url,
}

impl ElasticClient {
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self, InfraError> {
        let base = Url::parse(base_url)
            .map_err(|err| InfraError::engine(format!("invalid engine url `{base_url}`: {err}")))?;
        let http = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|err| InfraError::engine(format!("http client build failed: {err}")))?;
        Ok(Self { http, base })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, EngineError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| EngineError::transport("engine base url cannot be a base"))?
            .extend(segments);
        Ok(url)
    }
}

#[derive(Debug, Deserialize)]
struct DocEnvelope {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default, rename = "_source")]
    source: Value,
    #[serde(default)]
    found: bool,
}

impl DocEnvelope {
    fn into_document(self) -> RawDocument {
        RawDocument {
            id: self.id,
            source: self.source,
        }
    }
}

#[derive(Debug, Deserialize)]
struct MultiGetEnvelope {
    docs: Vec<DocEnvelope>,
}

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    total: TotalEnvelope,
    hits: Vec<SearchHitEnvelope>,
}

#[derive(Debug, Deserialize)]
struct TotalEnvelope {
    value: u64,
}

#[derive(Debug, Deserialize)]
struct SearchHitEnvelope {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default, rename = "_source")]
    source: Value,
}

#[async_trait]
impl SearchEngineClient for ElasticClient {
    async fn get_by_id(&self, index: &str, id: &str) -> Result<RawDocument, EngineError> {
        let url = self.endpoint(&[index, "_doc", id])?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(EngineError::transport)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(EngineError::NotFound);
        }
        let response = require_success(response).await?;
        let envelope: DocEnvelope = response.json().await.map_err(EngineError::transport)?;
        if !envelope.found {
            return Err(EngineError::NotFound);
        }
        Ok(envelope.into_document())
    }

    async fn multi_get(
        &self,
        index: &str,
        ids: &[String],
    ) -> Result<Vec<RawDocument>, EngineError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let url = self.endpoint(&[index, "_mget"])?;
        let response = self
            .http
            .post(url)
            .json(&json!({ "ids": ids }))
            .send()
            .await
            .map_err(EngineError::transport)?;
        let response = require_success(response).await?;
        let envelope: MultiGetEnvelope = response.json().await.map_err(EngineError::transport)?;
        Ok(envelope
            .docs
            .into_iter()
            .filter(|doc| doc.found)
            .map(DocEnvelope::into_document)
            .collect())
    }

    async fn execute_query(
        &self,
        index: &str,
        query: &Value,
    ) -> Result<SearchResult, EngineError> {
        let url = self.endpoint(&[index, "_search"])?;
        let response = self
            .http
            .post(url)
            .json(query)
            .send()
            .await
            .map_err(EngineError::transport)?;
        if response.status() == StatusCode::BAD_REQUEST {
            let reason = response.text().await.unwrap_or_default();
            return Err(EngineError::Query(reason));
        }
        let response = require_success(response).await?;
        let envelope: SearchEnvelope = response.json().await.map_err(EngineError::transport)?;
        Ok(SearchResult {
            total: envelope.hits.total.value,
            hits: envelope
                .hits
                .hits
                .into_iter()
                .map(|hit| RawDocument {
                    id: hit.id,
                    source: hit.source,
                })
                .collect(),
        })
    }
}

async fn require_success(response: Response) -> Result<Response, EngineError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(EngineError::Transport(format!(
        "engine returned {status}: {body}"
    )))
}
