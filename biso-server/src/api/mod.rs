pub mod error;
pub mod hashtags;
pub mod posts;

pub use error::{ApiError, ApiResult};

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::state::AppState;

/// Build the HTTP router for the feed
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Post routes
        .route("/posts", get(posts::get_posts).post(posts::create_post))
        .route("/posts/:id", get(posts::get_post).delete(posts::delete_post))
        .route(
            "/posts/:id/favorite",
            post(posts::favorite_post).delete(posts::unfavorite_post),
        )
        .route("/favorites", get(posts::get_favorites))
        // Hashtag routes
        .route("/hashtags", get(hashtags::list_hashtags))
        .route("/hashtags/:tag/similar", get(hashtags::get_similar_hashtags))
        .route("/hashtags/:tag/posts", get(hashtags::get_hashtag_feed))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

async fn health_check() -> &'static str {
    "OK"
}
