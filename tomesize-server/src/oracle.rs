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

//! Height oracle backends available to the server
//!
//! The remote backend talks to a rendering service that loads the `/test`
//! harness page, writes the text into its measured paragraph and reports the
//! resulting height.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tomesize_core::{GlyphMetricsOracle, HeightOracle, OracleError, PagePosition};

use crate::config::{OracleBackend, OracleConfig};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MeasureRequest<'a> {
    text: &'a str,
    first_page: bool,
}

#[derive(Debug, Deserialize)]
struct MeasureResponse {
    height: f64,
}

/// Oracle backed by a remote rendering service
pub struct RemoteHeightOracle {
    client: Client,
    endpoint: Url,
}

impl RemoteHeightOracle {
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build oracle HTTP client")?;
        Ok(Self { client, endpoint })
    }
}

/// Convert a reported height to whole pixels, rounding partial pixels up.
fn whole_pixels(height: f64) -> Result<u32, OracleError> {
    if !height.is_finite() || height < 0.0 || height > f64::from(u32::MAX) {
        return Err(OracleError::InvalidResponse(format!(
            "height out of range: {}",
            height
        )));
    }
    Ok(height.ceil() as u32)
}

#[async_trait]
impl HeightOracle for RemoteHeightOracle {
    async fn measure(&self, text: &str, position: PagePosition) -> Result<u32, OracleError> {
        let request = MeasureRequest {
            text,
            first_page: position.is_first(),
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| OracleError::Unavailable(e.to_string()))?;

        let body: MeasureResponse = response
            .json()
            .await
            .map_err(|e| OracleError::InvalidResponse(e.to_string()))?;

        whole_pixels(body.height)
    }

    fn name(&self) -> &str {
        "remote"
    }
}

/// Build the oracle selected by the configuration
pub fn build_oracle(config: &OracleConfig) -> Result<Arc<dyn HeightOracle>> {
    match config.backend {
        OracleBackend::Glyph => {
            tracing::info!(metrics = ?config.metrics, "Using glyph-metrics height oracle");
            Ok(Arc::new(GlyphMetricsOracle::new(config.metrics)))
        }
        OracleBackend::Remote => {
            let endpoint = config
                .endpoint
                .as_deref()
                .context("remote oracle requires an endpoint")?;
            let endpoint = Url::parse(endpoint)
                .with_context(|| format!("invalid oracle endpoint '{}'", endpoint))?;
            tracing::info!(%endpoint, "Using remote height oracle");
            Ok(Arc::new(RemoteHeightOracle::new(
                endpoint,
                Duration::from_secs(config.timeout_secs),
            )?))
        }
    }
}
