use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::{Router, routing::get};

use super::api::api_router;
use crate::config::ServerConfig;
use crate::error::Result;
use crate::planets::SwapiClient;
use crate::store::Store;

pub struct AppState {
    pub store: Arc<dyn Store>,
    /// Upstream planets are ingested from.
    pub source: SwapiClient,
    pub token_ttl_seconds: Option<i64>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: &ServerConfig) -> Result<Self> {
        Ok(Self {
            store,
            source: SwapiClient::new(config.source_url.clone())?,
            token_ttl_seconds: config.token_ttl_seconds,
        })
    }
}

async fn health() -> &'static str {
    "OK"
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    tracing::info!(
        "{} {} {} {}ms",
        method,
        uri.path(),
        status.as_u16(),
        latency.as_millis()
    );

    response
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", api_router())
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}
