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

//! HTTP handlers
//!
//! Every response, including failures, is sent with status 200. Failures carry
//! `{"error": true, "message": ...}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tomesize_core::{HeightOracle, TomeError};

use crate::upstream::{ContentSource, UpstreamError};

pub mod harness;
pub mod size;

pub use harness::measurement_harness;
pub use size::{get_size, missing_slug, SizeQuery, SizeResponse};

/// API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("need a slug")]
    MissingSlug,

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Estimate(#[from] TomeError),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: true,
            message: self.to_string(),
        };
        (StatusCode::OK, Json(body)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: bool,
    pub message: String,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn ContentSource>,
    pub oracle: Arc<dyn HeightOracle>,
    pub honor_accurate_flag: bool,
    pub request_timeout: Duration,
}
