use std::sync::Arc;

use askama::Template;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::error::{AppError, Result};
use crate::geolocation::StaticGeolocation;
use crate::map::MapScene;
use crate::models::{Coords, Workout, WorkoutForm, WorkoutType};
use crate::repositories::KeyValueRepository;
use crate::tracker::{Tracker, TrackerError};
use crate::views::{FormState, ListEntry};

pub type AppTracker = Tracker<MapScene, KeyValueRepository, StaticGeolocation>;

#[derive(Clone)]
pub struct WorkoutsState {
    pub tracker: Arc<Mutex<AppTracker>>,
}

impl WorkoutsState {
    pub fn new(tracker: AppTracker) -> Self {
        Self {
            tracker: Arc::new(Mutex::new(tracker)),
        }
    }
}

// Templates
#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    entries: Vec<ListEntry>,
    form: FormState,
    map_loaded: bool,
    scene_json: String,
    alert: Option<String>,
}

// Form payloads
#[derive(Deserialize)]
pub struct MapClickForm {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Deserialize)]
pub struct ToggleForm {
    #[serde(rename = "type")]
    pub kind: WorkoutType,
}

/// Run a synchronous tracker operation on the blocking pool while holding the
/// tracker lock.
async fn with_tracker<F, T>(state: &WorkoutsState, f: F) -> Result<T>
where
    F: FnOnce(&mut AppTracker) -> T + Send + 'static,
    T: Send + 'static,
{
    let mut tracker = state.tracker.clone().lock_owned().await;
    tokio::task::spawn_blocking(move || f(&mut *tracker))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))
}

fn render_page(tracker: &mut AppTracker) -> Result<String> {
    let scene_json =
        serde_json::to_string(tracker.map()).map_err(|e| AppError::Internal(e.to_string()))?;

    let template = IndexTemplate {
        entries: tracker.entries().to_vec(),
        form: tracker.form().clone(),
        map_loaded: tracker.is_map_loaded(),
        scene_json,
        alert: tracker.take_alert(),
    };

    template
        .render()
        .map_err(|e| AppError::Internal(e.to_string()))
}

// Handlers
pub async fn index(State(state): State<WorkoutsState>) -> Result<Response> {
    let mut tracker = state.tracker.lock().await;
    Ok(Html(render_page(&mut tracker)?).into_response())
}

pub async fn map_click(
    State(state): State<WorkoutsState>,
    Form(form): Form<MapClickForm>,
) -> Result<Response> {
    with_tracker(&state, move |tracker| {
        tracker.handle_map_click(Coords::new(form.lat, form.lng))
    })
    .await??;

    Ok(Redirect::to("/").into_response())
}

pub async fn toggle_type(
    State(state): State<WorkoutsState>,
    Form(form): Form<ToggleForm>,
) -> Result<Response> {
    let mut tracker = state.tracker.lock().await;
    tracker.toggle_form_fields(form.kind);

    Ok(Redirect::to("/").into_response())
}

pub async fn create(
    State(state): State<WorkoutsState>,
    Form(form): Form<WorkoutForm>,
) -> Result<Response> {
    with_tracker(&state, move |tracker| {
        let outcome = tracker.submit_workout(form).map(|_| ());
        match outcome {
            Ok(()) => Ok(Redirect::to("/").into_response()),
            Err(TrackerError::InvalidInput(_)) => {
                let page = render_page(tracker)?;
                Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(page)).into_response())
            }
            Err(e) => Err(AppError::from(e)),
        }
    })
    .await?
}

pub async fn select(
    State(state): State<WorkoutsState>,
    Path(id): Path<String>,
) -> Result<Response> {
    with_tracker(&state, move |tracker| {
        tracker.select_workout(&id).map(|_| ())
    })
    .await??;

    Ok(Redirect::to("/").into_response())
}

/// Wipe storage on the blocking pool, then reload the map while still holding
/// the tracker lock.
pub async fn reset(State(state): State<WorkoutsState>) -> Result<Response> {
    let tracker = state.tracker.clone().lock_owned().await;
    let mut tracker = tokio::task::spawn_blocking(move || {
        let mut tracker = tracker;
        tracker.clear().map(|()| tracker)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    if let Err(e) = tracker.locate().await {
        tracing::debug!("Reloaded without a map: {}", e);
    }

    Ok(Redirect::to("/").into_response())
}

pub async fn list_json(State(state): State<WorkoutsState>) -> Json<Vec<Workout>> {
    let tracker = state.tracker.lock().await;
    Json(tracker.workouts().to_vec())
}

pub async fn map_json(State(state): State<WorkoutsState>) -> Json<MapScene> {
    let tracker = state.tracker.lock().await;
    Json(tracker.map().clone())
}
