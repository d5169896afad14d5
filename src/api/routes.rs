use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Articles
        .route("/articles", get(handlers::search_articles))
        .route("/articles", post(handlers::create_article))
        .route("/articles/:id", get(handlers::get_article))
        // Sources
        .route("/sources", get(handlers::get_sources))
        // Preferences
        .route("/preferences", get(handlers::get_preferences))
        .route("/preferences", post(handlers::set_preferences))
        // Favorites
        .route("/favorites", get(handlers::get_favorites))
        .route("/favorites", post(handlers::add_favorite))
        // Comments
        .route("/comments", post(handlers::add_comment))
        // Recommendations
        .route("/recommended", get(handlers::get_recommended))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
