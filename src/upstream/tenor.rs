//! Tenor search and media client.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

use crate::config::GifConfig;
use crate::observability::metrics;
use crate::upstream::{GifProvider, UpstreamError, UpstreamResult};

const PROVIDER: &str = "tenor";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    media: Vec<MediaFormats>,
}

#[derive(Debug, Deserialize)]
struct MediaFormats {
    gif: Option<MediaObject>,
}

#[derive(Debug, Deserialize)]
struct MediaObject {
    url: String,
}

/// Client for Tenor's v1 search API and its media storage.
#[derive(Debug, Clone)]
pub struct TenorClient {
    http: reqwest::Client,
    base_url: String,
    media_base_url: String,
    api_token: String,
}

impl TenorClient {
    pub fn new(http: reqwest::Client, config: &GifConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.clone(),
            media_base_url: config.media_base_url.clone(),
            api_token: config.api_token.clone(),
        }
    }

    async fn get(&self, request: reqwest::RequestBuilder) -> UpstreamResult<reqwest::Response> {
        let response = request.send().await.map_err(|source| {
            metrics::record_upstream_call(PROVIDER, "transport_error");
            UpstreamError::Transport { provider: PROVIDER, source }
        })?;

        let status = response.status();
        metrics::record_upstream_call(PROVIDER, status.as_str());
        match status {
            StatusCode::UNAUTHORIZED => Err(UpstreamError::Unauthorized { provider: PROVIDER }),
            s if !s.is_success() => Err(UpstreamError::Status {
                provider: PROVIDER,
                status: s.as_u16(),
            }),
            _ => Ok(response),
        }
    }
}

#[async_trait]
impl GifProvider for TenorClient {
    async fn search_ids(&self, query: &str, limit: u32) -> UpstreamResult<Vec<String>> {
        tracing::debug!(query = %query, limit, "Searching GIFs");

        let limit = limit.to_string();
        let request = self.http.get(format!("{}search", self.base_url)).query(&[
            ("q", query),
            ("key", self.api_token.as_str()),
            ("limit", limit.as_str()),
        ]);
        let body = self
            .get(request)
            .await?
            .bytes()
            .await
            .map_err(|source| UpstreamError::Transport { provider: PROVIDER, source })?;

        let ids = parse_search_ids(&body)?;
        if ids.is_empty() {
            return Err(UpstreamError::EmptyResult {
                provider: PROVIDER,
                query: query.to_string(),
            });
        }
        Ok(ids)
    }

    async fn fetch_gif(&self, id: &str) -> UpstreamResult<Vec<u8>> {
        tracing::debug!(id = %id, "Downloading GIF");

        let request = self.http.get(format!("{}{}/tenor.gif", self.media_base_url, id));
        let body = self
            .get(request)
            .await?
            .bytes()
            .await
            .map_err(|source| UpstreamError::Transport { provider: PROVIDER, source })?;
        Ok(body.to_vec())
    }
}

/// Collect GIF ids from a search payload, skipping results without a GIF.
fn parse_search_ids(body: &[u8]) -> UpstreamResult<Vec<String>> {
    let parsed: SearchResponse = serde_json::from_slice(body).map_err(|e| UpstreamError::Decode {
        provider: PROVIDER,
        message: e.to_string(),
    })?;

    let ids = parsed
        .results
        .iter()
        .filter_map(|result| result.media.first()?.gif.as_ref())
        .filter_map(|gif| {
            let id = gif_id_from_url(&gif.url);
            if id.is_none() {
                tracing::debug!(url = %gif.url, "Skipping GIF url without an id segment");
            }
            id
        })
        .collect();
    Ok(ids)
}

/// The id is the directory holding the file: `.../images/{id}/tenor.gif`.
fn gif_id_from_url(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    let segments: Vec<&str> = url.path_segments()?.collect();
    if segments.len() < 2 {
        return None;
    }
    let id = segments[segments.len() - 2];
    (!id.is_empty()).then(|| id.to_string())
}
