//! HTTP API module
//!
//! A thin UI-facing surface over [`AppState`]: read-only snapshots plus the
//! session operations. None of the state machine lives here.

pub mod handlers;
pub mod responses;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .route("/steps/:step_id/toggle", post(toggle_handler))
        .route("/timer/start", post(start_timer_handler))
        .route("/timer/pause", post(pause_handler))
        .route("/timer/resume", post(resume_handler))
        .route("/timer/reset", post(reset_timer_handler))
        .route("/alarm/:step_id/dismiss", post(dismiss_handler))
        .route("/reset", post(reset_all_handler))
        .route("/visibility", post(visibility_handler))
        .route("/sound", post(sound_handler))
        .route("/recipes", get(list_recipes_handler).post(import_recipe_handler))
        .route("/recipes/:recipe_id", delete(delete_recipe_handler))
        .route("/recipes/:recipe_id/activate", post(activate_recipe_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
