// Copyright 2025 Sushanth (https://github.com/sushanthpy)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Client for the content API serving page metadata and memory lists

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tomesize_core::ContentList;
use tracing::debug;

use crate::config::UpstreamConfig;

/// Errors from the content API
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("incorrect slug")]
    IncorrectSlug,

    #[error("invalid upstream base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Source of collection metadata and content items
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch page metadata, rejecting unknown slugs.
    async fn fetch_page(&self, slug: &str) -> Result<Value, UpstreamError>;

    /// Fetch the ceremony and memory items of a collection.
    async fn fetch_list(&self, slug: &str) -> Result<ContentList, UpstreamError>;
}

/// Whether a page payload denotes an unknown slug.
pub fn is_rejected_page(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::String(text) => text.is_empty(),
        Value::Object(fields) => fields.contains_key("err"),
        _ => false,
    }
}

/// HTTP client for the inmemori content API
pub struct InmemoriClient {
    client: Client,
    base_url: Url,
}

impl InmemoriClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|_| UpstreamError::InvalidBaseUrl(config.base_url.clone()))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("tomesize/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, base_url })
    }

    /// Base URL with `segments` appended, each percent-encoded as one path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, UpstreamError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| UpstreamError::InvalidBaseUrl(self.base_url.to_string()))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, UpstreamError> {
        debug!(%url, "fetching upstream");
        let body = self.client.get(url).send().await?.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl ContentSource for InmemoriClient {
    async fn fetch_page(&self, slug: &str) -> Result<Value, UpstreamError> {
        let url = self.endpoint(&["pages", slug])?;
        let payload: Value = self.get_json(url).await?;
        if is_rejected_page(&payload) {
            return Err(UpstreamError::IncorrectSlug);
        }
        Ok(payload)
    }

    async fn fetch_list(&self, slug: &str) -> Result<ContentList, UpstreamError> {
        let mut url = self.endpoint(&["memories", "list", slug])?;
        url.query_pairs_mut().append_pair("byCategory", "true");
        self.get_json(url).await
    }
}
