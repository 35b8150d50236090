//! # rostra-api
//!
//! The web routing and orchestration layer for Rostra.

pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::routing::{get, patch, post};
use axum::Router;

pub use handlers::AppState;

/// Builds the API router over a fully assembled `AppState`.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/debates", get(handlers::list_debates).post(handlers::create_debate))
        .route("/debates/search", get(handlers::search_debates))
        .route("/debates/{id}", get(handlers::debate_detail))
        .route("/debates/{id}/join", post(handlers::join_debate))
        .route("/debates/{id}/arguments", post(handlers::post_argument))
        .route(
            "/arguments/{id}",
            patch(handlers::edit_argument).delete(handlers::delete_argument),
        )
        .route("/votes", post(handlers::cast_vote))
        .route("/leaderboard", get(handlers::leaderboard))
        .layer(middleware::trace_layer())
        .layer(middleware::cors_policy())
        .with_state(state)
}
