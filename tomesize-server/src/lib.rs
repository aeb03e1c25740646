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

//! Tomesize HTTP server
//!
//! Serves size codes for collections held by the content API.

pub mod api;
pub mod config;
pub mod oracle;
pub mod upstream;

use anyhow::Result;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::{get_size, measurement_harness, missing_slug, AppState};
use config::ServerConfig;
use upstream::InmemoriClient;

const DEFAULT_LOG_FILTER: &str = "tomesize_server=info,tomesize_core=info,tower_http=info";

/// Install the global tracing subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Build the application router
pub fn build_router(state: AppState, enable_cors: bool) -> Router {
    Router::new()
        .route("/", get(missing_slug))
        .route("/test", get(measurement_harness))
        .route("/:slug", get(get_size))
        .with_state(state)
        .layer(if enable_cors {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            CorsLayer::new()
        })
        .layer(TraceLayer::new_for_http())
}

pub async fn run_server(config: ServerConfig) -> Result<()> {
    init_tracing(config.server.json_logs);

    tracing::info!("Starting Tomesize Server");
    tracing::info!("Configuration: {:#?}", config);

    config.validate()?;
    let addr = config.socket_addr()?;

    let source = InmemoriClient::new(&config.upstream)?;
    let oracle = oracle::build_oracle(&config.oracle)?;

    let state = AppState {
        source: Arc::new(source),
        oracle,
        honor_accurate_flag: config.estimate.honor_accurate_flag,
        request_timeout: config.request_timeout(),
    };

    let app = build_router(state, config.server.enable_cors);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
