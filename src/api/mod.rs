use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::pipeline::KeywordPipeline;

pub mod handlers;
pub mod models;

pub fn create_router(pipeline: Arc<KeywordPipeline>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::home_handler))
        .route("/generate", post(handlers::generate_handler))
        .with_state(pipeline)
        .layer(cors)
}
