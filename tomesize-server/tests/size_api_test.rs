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

//! Router level tests for the size endpoints

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tomesize_core::{
    ContentItem, ContentList, GlyphMetricsOracle, HeightOracle, OracleError, PagePosition,
};
use tomesize_server::{
    api::AppState,
    build_router,
    upstream::{ContentSource, UpstreamError},
};
use tower::ServiceExt;

/// In-memory content API keyed by slug
#[derive(Default)]
struct FakeSource {
    lists: HashMap<String, ContentList>,
    delay: Option<Duration>,
}

impl FakeSource {
    fn with(mut self, slug: &str, list: ContentList) -> Self {
        self.lists.insert(slug.to_string(), list);
        self
    }
}

#[async_trait]
impl ContentSource for FakeSource {
    async fn fetch_page(&self, slug: &str) -> Result<Value, UpstreamError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.lists.contains_key(slug) {
            true => Ok(json!({ "slug": slug })),
            false => Err(UpstreamError::IncorrectSlug),
        }
    }

    async fn fetch_list(&self, slug: &str) -> Result<ContentList, UpstreamError> {
        self.lists
            .get(slug)
            .cloned()
            .ok_or(UpstreamError::IncorrectSlug)
    }
}

struct DownOracle;

#[async_trait]
impl HeightOracle for DownOracle {
    async fn measure(&self, _text: &str, _position: PagePosition) -> Result<u32, OracleError> {
        Err(OracleError::Unavailable("renderer down".to_string()))
    }

    fn name(&self) -> &str {
        "down"
    }
}

fn list(memories: Vec<ContentItem>) -> ContentList {
    ContentList {
        ceremony: vec![ContentItem::new("welcome")],
        memory: memories,
    }
}

/// 12000 words of nine per line, laid out over 61 pages.
fn long_message() -> String {
    vec!["lorem ipsum"; 6000].join(" ")
}

fn state(source: FakeSource, oracle: Arc<dyn HeightOracle>) -> AppState {
    AppState {
        source: Arc::new(source),
        oracle,
        honor_accurate_flag: true,
        request_timeout: Duration::from_secs(5),
    }
}

fn app(source: FakeSource) -> Router {
    build_router(state(source, Arc::new(GlyphMetricsOracle::default())), true)
}

async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn get_json(app: Router, uri: &str) -> Value {
    let (status, body) = get(app, uri).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_str(&body).unwrap()
}

#[tokio::test]
async fn root_needs_a_slug() {
    let body = get_json(app(FakeSource::default()), "/").await;
    assert_eq!(body, json!({"error": true, "message": "need a slug"}));
}

#[tokio::test]
async fn known_slug_gets_a_size() {
    let source = FakeSource::default().with("jane-doe", list(vec![ContentItem::new("so kind")]));
    let body = get_json(app(source), "/jane-doe").await;
    assert_eq!(body, json!({"slug": "jane-doe", "size": "s"}));
}

#[tokio::test]
async fn unknown_slug_is_incorrect() {
    let body = get_json(app(FakeSource::default()), "/nobody").await;
    assert_eq!(body, json!({"error": true, "message": "incorrect slug"}));
}

#[tokio::test]
async fn harness_page_is_served() {
    let (status, body) = get(app(FakeSource::default()), "/test").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<p></p>"));
    assert!(body.contains("function measure(text)"));
}

#[tokio::test]
async fn accurate_flag_paginates_messages() {
    let source = || {
        FakeSource::default().with("long", list(vec![ContentItem::new(long_message())]))
    };

    // 6 front matter pages, 1 ceremony page, 61 memory pages
    let body = get_json(app(source()), "/long?accurate=true").await;
    assert_eq!(body["size"], "m");

    let body = get_json(app(source()), "/long").await;
    assert_eq!(body["size"], "s");

    let body = get_json(app(source()), "/long?accurate=yes").await;
    assert_eq!(body["size"], "s");
}

#[tokio::test]
async fn accurate_flag_can_be_disabled() {
    let source = FakeSource::default().with("long", list(vec![ContentItem::new(long_message())]));
    let mut state = state(source, Arc::new(GlyphMetricsOracle::default()));
    state.honor_accurate_flag = false;

    let body = get_json(build_router(state, false), "/long?accurate=true").await;
    assert_eq!(body["size"], "s");
}

#[tokio::test]
async fn oracle_failure_is_reported_in_body() {
    let source = FakeSource::default().with("jane-doe", list(vec![ContentItem::new("so kind")]));
    let app = build_router(state(source, Arc::new(DownOracle)), true);

    let body = get_json(app, "/jane-doe?accurate=true").await;
    assert_eq!(body["error"], true);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("height oracle unavailable"));
}

#[tokio::test]
async fn slow_upstream_times_out() {
    let source = FakeSource {
        delay: Some(Duration::from_millis(500)),
        ..Default::default()
    }
    .with("jane-doe", list(vec![ContentItem::new("so kind")]));
    let mut state = state(source, Arc::new(GlyphMetricsOracle::default()));
    state.request_timeout = Duration::from_millis(50);

    let body = get_json(build_router(state, true), "/jane-doe").await;
    assert_eq!(body["error"], true);
    assert_eq!(body["message"], "request timed out after 50ms");
}
