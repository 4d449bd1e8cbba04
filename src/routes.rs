use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{health, workouts};

pub fn create_router(workouts_state: workouts::WorkoutsState) -> Router {
    Router::new()
        // Page
        .route("/", get(workouts::index))
        .route("/map/click", post(workouts::map_click))
        .route("/form/type", post(workouts::toggle_type))
        .route("/workouts", post(workouts::create))
        .route("/workouts/{id}/select", post(workouts::select))
        .route("/reset", post(workouts::reset))
        // JSON
        .route("/api/workouts", get(workouts::list_json))
        .route("/api/map", get(workouts::map_json))
        .route("/health", get(health::health_check))
        .with_state(workouts_state)
}
