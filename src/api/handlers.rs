//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{debug, info, warn};

use super::responses::{
    ActionResponse, ErrorResponse, HealthResponse, SoundRequest, StartTimerRequest,
    StatusResponse, VisibilityRequest,
};
use crate::{error::RecipeError, recipe::Recipe, state::AppState};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn action(state: &AppState, applied: bool) -> Json<ActionResponse> {
    Json(ActionResponse::new(applied, state.snapshot()))
}

fn recipe_error(e: RecipeError) -> ApiError {
    let status = match e {
        RecipeError::NotFound(_) => StatusCode::NOT_FOUND,
        RecipeError::Empty(_) | RecipeError::DuplicateStep { .. } => StatusCode::UNPROCESSABLE_ENTITY,
    };
    (status, Json(ErrorResponse::new(e)))
}

/// Handle GET /status - Return current session state
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse::new(
        state.snapshot(),
        state.alarm_ringing(),
        state.sound_enabled(),
        state.get_uptime(),
    ))
}

/// Handle POST /steps/:id/toggle - Complete or reopen a step
pub async fn toggle_handler(
    State(state): State<Arc<AppState>>,
    Path(step_id): Path<u32>,
) -> Json<ActionResponse> {
    let applied = state.toggle(step_id);
    debug!("Toggle endpoint called for step {} (applied={})", step_id, applied);
    action(&state, applied)
}

/// Handle POST /timer/start - Start a countdown manually
pub async fn start_timer_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<StartTimerRequest>,
) -> Result<Json<ActionResponse>, ApiError> {
    match state.start_timer(request.step_id, request.duration_seconds) {
        Ok(applied) => Ok(action(&state, applied)),
        Err(e) => {
            warn!("Timer start rejected: {}", e);
            Err((StatusCode::UNPROCESSABLE_ENTITY, Json(ErrorResponse::new(e))))
        }
    }
}

/// Handle POST /timer/pause
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Json<ActionResponse> {
    let applied = state.pause();
    action(&state, applied)
}

/// Handle POST /timer/resume
pub async fn resume_handler(State(state): State<Arc<AppState>>) -> Json<ActionResponse> {
    let applied = state.resume();
    action(&state, applied)
}

/// Handle POST /timer/reset
pub async fn reset_timer_handler(State(state): State<Arc<AppState>>) -> Json<ActionResponse> {
    let applied = state.reset_timer();
    action(&state, applied)
}

/// Handle POST /alarm/:id/dismiss - Stop the alarm and move on
pub async fn dismiss_handler(
    State(state): State<Arc<AppState>>,
    Path(step_id): Path<u32>,
) -> Json<ActionResponse> {
    let applied = state.dismiss_alarm(step_id);
    info!("Dismiss endpoint called for step {} (applied={})", step_id, applied);
    action(&state, applied)
}

/// Handle POST /reset - Start over
pub async fn reset_all_handler(State(state): State<Arc<AppState>>) -> Json<ActionResponse> {
    state.reset_all();
    action(&state, true)
}

/// Handle POST /visibility - UI reports it is visible (or hidden) again
pub async fn visibility_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<VisibilityRequest>,
) -> Json<ActionResponse> {
    if request.visible {
        state.on_foreground();
    }
    action(&state, request.visible)
}

/// Handle POST /sound - Enable or mute audio output
pub async fn sound_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SoundRequest>,
) -> Json<StatusResponse> {
    state.set_sound_enabled(request.enabled);
    status_handler(State(state)).await
}

/// Handle GET /recipes
pub async fn list_recipes_handler(State(state): State<Arc<AppState>>) -> Json<Vec<Recipe>> {
    Json(state.recipes())
}

/// Handle POST /recipes - Import or replace a recipe
pub async fn import_recipe_handler(
    State(state): State<Arc<AppState>>,
    Json(recipe): Json<Recipe>,
) -> Result<Json<Vec<Recipe>>, ApiError> {
    state.import_recipe(recipe).map_err(recipe_error)?;
    Ok(Json(state.recipes()))
}

/// Handle DELETE /recipes/:id
pub async fn delete_recipe_handler(
    State(state): State<Arc<AppState>>,
    Path(recipe_id): Path<String>,
) -> Result<Json<Recipe>, ApiError> {
    state.delete_recipe(&recipe_id).map(Json).map_err(recipe_error)
}

/// Handle POST /recipes/:id/activate - Switch the session to a recipe
pub async fn activate_recipe_handler(
    State(state): State<Arc<AppState>>,
    Path(recipe_id): Path<String>,
) -> Result<Json<ActionResponse>, ApiError> {
    state.activate_recipe(&recipe_id).map_err(recipe_error)?;
    Ok(action(&state, true))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
