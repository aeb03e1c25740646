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

use anyhow::Result;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tomesize_core::GlyphMetrics;

/// Tomesize Server Configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: HttpServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub oracle: OracleConfig,
    #[serde(default)]
    pub estimate: EstimateConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpServerConfig {
    /// HTTP listen address (e.g., "0.0.0.0:5000")
    #[serde(default = "default_http_addr")]
    pub listen_addr: String,

    /// Upper bound for a whole size request in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Enable CORS
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,

    /// Emit logs as JSON lines
    #[serde(default)]
    pub json_logs: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Base URL of the content API
    #[serde(default = "default_upstream_url")]
    pub base_url: String,

    #[serde(default = "default_upstream_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OracleBackend {
    /// Local word-wrap estimate with fixed glyph metrics
    #[default]
    Glyph,
    /// Rendering service measuring the `/test` harness page
    Remote,
}

impl std::str::FromStr for OracleBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "glyph" => Ok(OracleBackend::Glyph),
            "remote" => Ok(OracleBackend::Remote),
            other => anyhow::bail!("unknown oracle backend '{}'", other),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OracleConfig {
    #[serde(default)]
    pub backend: OracleBackend,

    /// Measurement endpoint, required for the remote backend
    pub endpoint: Option<String>,

    #[serde(default = "default_oracle_timeout")]
    pub timeout_secs: u64,

    /// Print style metrics for the glyph backend
    #[serde(default)]
    pub metrics: GlyphMetrics,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EstimateConfig {
    /// Honor `?accurate=true`; when false every request is approximate
    #[serde(default = "default_honor_accurate_flag")]
    pub honor_accurate_flag: bool,
}

// Default values
fn default_http_addr() -> String {
    "0.0.0.0:5000".to_string()
}

fn default_request_timeout() -> u64 {
    60
}

fn default_enable_cors() -> bool {
    true
}

fn default_upstream_url() -> String {
    "https://api.inmemori.com".to_string()
}

fn default_upstream_timeout() -> u64 {
    15
}

fn default_oracle_timeout() -> u64 {
    10
}

fn default_honor_accurate_flag() -> bool {
    true
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_http_addr(),
            request_timeout_secs: default_request_timeout(),
            enable_cors: default_enable_cors(),
            json_logs: false,
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_upstream_url(),
            timeout_secs: default_upstream_timeout(),
        }
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            backend: OracleBackend::default(),
            endpoint: None,
            timeout_secs: default_oracle_timeout(),
            metrics: GlyphMetrics::default(),
        }
    }
}

impl Default for EstimateConfig {
    fn default() -> Self {
        Self {
            honor_accurate_flag: default_honor_accurate_flag(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from environment variables
    ///
    /// Supported environment variables:
    /// - PORT: listen on 0.0.0.0:$PORT
    /// - TOMESIZE_HTTP_ADDR: HTTP listen address, takes precedence over PORT
    /// - TOMESIZE_UPSTREAM_URL: content API base URL
    /// - TOMESIZE_ORACLE_BACKEND: `glyph` or `remote`
    /// - TOMESIZE_ORACLE_ENDPOINT: measurement endpoint of the remote oracle
    /// - TOMESIZE_REQUEST_TIMEOUT: request timeout in seconds
    /// - TOMESIZE_JSON_LOGS: emit JSON logs
    pub fn from_env() -> Result<Self> {
        Self::merge_with_env(Self::default())
    }

    /// Load configuration with priority: env > file > defaults
    pub fn load(config_file: Option<PathBuf>) -> Result<Self> {
        let config = if let Some(path) = config_file {
            if path.exists() {
                tracing::info!("Loading configuration from file: {:?}", path);
                Self::from_file(&path)?
            } else {
                tracing::warn!("Config file not found: {:?}, using defaults", path);
                Self::default()
            }
        } else {
            Self::default()
        };

        Self::merge_with_env(config)
    }

    /// Override fields whose environment variable is set
    fn merge_with_env(mut config: Self) -> Result<Self> {
        if let Ok(port) = std::env::var("PORT") {
            let port: u16 = port.parse()?;
            config.server.listen_addr = format!("0.0.0.0:{}", port);
        }
        if let Ok(addr) = std::env::var("TOMESIZE_HTTP_ADDR") {
            config.server.listen_addr = addr;
        }
        if let Ok(url) = std::env::var("TOMESIZE_UPSTREAM_URL") {
            config.upstream.base_url = url;
        }
        if let Ok(backend) = std::env::var("TOMESIZE_ORACLE_BACKEND") {
            config.oracle.backend = backend.parse()?;
        }
        if let Ok(endpoint) = std::env::var("TOMESIZE_ORACLE_ENDPOINT") {
            config.oracle.endpoint = Some(endpoint);
        }
        if let Ok(timeout) = std::env::var("TOMESIZE_REQUEST_TIMEOUT") {
            config.server.request_timeout_secs = timeout.parse()?;
        }
        if let Ok(json) = std::env::var("TOMESIZE_JSON_LOGS") {
            config.server.json_logs = json.parse().unwrap_or(false);
        }

        Ok(config)
    }

    /// Parse listen address as SocketAddr
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(self.server.listen_addr.parse()?)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.socket_addr()?;

        if let Err(e) = Url::parse(&self.upstream.base_url) {
            anyhow::bail!("Invalid upstream base URL '{}': {}", self.upstream.base_url, e);
        }

        if self.server.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than zero");
        }

        if self.oracle.backend == OracleBackend::Remote {
            match &self.oracle.endpoint {
                Some(endpoint) => {
                    if let Err(e) = Url::parse(endpoint) {
                        anyhow::bail!("Invalid oracle endpoint '{}': {}", endpoint, e);
                    }
                }
                None => anyhow::bail!("Remote oracle backend selected but no endpoint configured"),
            }
        }

        Ok(())
    }
}
