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

//! Size estimation endpoint

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tomesize_core::{estimate, CountingMode, SizeCode};
use tracing::{info, warn};

use super::{ApiError, AppState};

#[derive(Debug, Default, Deserialize)]
pub struct SizeQuery {
    pub accurate: Option<String>,
}

impl SizeQuery {
    /// Counting mode requested by the caller; only the exact string `true` selects accurate.
    pub fn mode(&self) -> CountingMode {
        match self.accurate.as_deref() {
            Some("true") => CountingMode::Accurate,
            _ => CountingMode::Approximate,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SizeResponse {
    pub slug: String,
    pub size: SizeCode,
}

/// GET /
pub async fn missing_slug() -> ApiError {
    ApiError::MissingSlug
}

/// GET /:slug
///
/// Checks the slug against the page endpoint, fetches the collection and runs
/// the estimate pipeline. The whole request is bounded by the configured timeout.
pub async fn get_size(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<SizeQuery>,
) -> Result<Json<SizeResponse>, ApiError> {
    let mode = if state.honor_accurate_flag {
        query.mode()
    } else {
        CountingMode::Approximate
    };

    let limit = state.request_timeout;
    let result = match tokio::time::timeout(limit, size_of(&state, &slug, mode)).await {
        Ok(result) => result,
        Err(_) => Err(ApiError::Timeout(limit)),
    };

    match result {
        Ok(size) => {
            info!(%slug, ?mode, %size, "size estimated");
            Ok(Json(SizeResponse { slug, size }))
        }
        Err(e) => {
            warn!(%slug, ?mode, error = %e, "size estimation failed");
            Err(e)
        }
    }
}

async fn size_of(state: &AppState, slug: &str, mode: CountingMode) -> Result<SizeCode, ApiError> {
    state.source.fetch_page(slug).await?;
    let list = state.source.fetch_list(slug).await?;
    let estimate = estimate(&list, state.oracle.as_ref(), mode).await?;
    Ok(estimate.size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(accurate: Option<&str>) -> SizeQuery {
        SizeQuery {
            accurate: accurate.map(str::to_string),
        }
    }

    #[test]
    fn test_only_exact_true_is_accurate() {
        assert_eq!(query(Some("true")).mode(), CountingMode::Accurate);
        assert_eq!(query(Some("True")).mode(), CountingMode::Approximate);
        assert_eq!(query(Some("1")).mode(), CountingMode::Approximate);
        assert_eq!(query(Some("")).mode(), CountingMode::Approximate);
        assert_eq!(query(None).mode(), CountingMode::Approximate);
    }
}
