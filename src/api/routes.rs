use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;
use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Recommendations
        .route("/recommendations", post(handlers::recommend))
        // Taste preferences
        .route(
            "/users/:user_id/preferences",
            get(handlers::get_preferences)
                .put(handlers::update_preferences)
                .delete(handlers::reset_preferences),
        )
        // Ratings and what they teach us
        .route(
            "/users/:user_id/ratings",
            post(handlers::submit_rating).get(handlers::get_ratings),
        )
        .route("/users/:user_id/low-rated", get(handlers::get_low_rated))
        .route("/users/:user_id/affinity", get(handlers::get_affinity))
        .route(
            "/users/:user_id/unrated-cuisines",
            get(handlers::get_unrated_cuisines),
        )
        .route("/users/:user_id/model", get(handlers::get_model))
}
