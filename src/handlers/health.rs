use axum::{extract::State, Json};
use serde::Serialize;

use crate::handlers::workouts::WorkoutsState;
use crate::version::GIT_VERSION;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    git_version: &'static str,
    map_loaded: bool,
    workouts: usize,
}

pub async fn health_check(State(state): State<WorkoutsState>) -> Json<HealthResponse> {
    let tracker = state.tracker.lock().await;
    Json(HealthResponse {
        status: "ok",
        git_version: GIT_VERSION,
        map_loaded: tracker.is_map_loaded(),
        workouts: tracker.workouts().len(),
    })
}
