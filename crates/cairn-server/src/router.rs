use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use cairn_engine::ChunkEngine;
use cairn_protocol::endpoints;

use crate::handler;

/// Shared state handed to request handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ChunkEngine>,
    pub fetch_concurrency: usize,
}

/// Build the axum router with all Cairn endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::STREAM, post(handler::put_stream))
        .route("/v1/stream/:etag", get(handler::get_stream))
        .route(endpoints::OBJECT, post(handler::put_object))
        .route("/v1/object/:etag", get(handler::get_object))
        .route(endpoints::HEALTH, get(handler::health))
        .route(endpoints::INFO, get(handler::info))
        // Objects can be arbitrarily large; bounding transfers is the
        // chunked path's job, not the body extractor's.
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
