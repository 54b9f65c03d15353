use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::client::SearchService;

pub mod handlers;
pub mod models;

pub fn create_router<S: SearchService>(service: Arc<S>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/search", get(handlers::search_handler::<S>))
        .route("/api/suggest", get(handlers::suggest_handler::<S>))
        .with_state(service)
        .layer(cors)
}
