//! The workout tracker: owns the workout list and wires map clicks, form
//! submissions and list selections to state changes, rendering and storage.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::geolocation::{Geolocation, GeolocationError};
use crate::map::{MapCapability, PopupOptions, TileLayer, ViewOptions};
use crate::models::{
    restore_workouts, Coords, InvalidInput, Workout, WorkoutForm, WorkoutInput, WorkoutType,
};
use crate::storage::{Storage, StorageError};
use crate::views::{popup_content, FormState, ListEntry};

pub const STORAGE_KEY: &str = "workouts";
pub const DEFAULT_ZOOM: u8 = 13;
pub const POSITION_UNAVAILABLE_MESSAGE: &str = "Could not get your current position.";

const HOME_POPUP: &str = "You are here! 😀";
const PAN_DURATION_SECS: f64 = 1.0;
const ID_DIGITS: usize = 10;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Could not get your current position.")]
    PositionUnavailable(#[source] GeolocationError),

    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),

    #[error("Invalid map coordinates")]
    InvalidCoordinates,

    #[error("Click on the map to choose where the workout happened")]
    NoPendingClick,

    #[error("The map has not been loaded")]
    MapNotLoaded,

    #[error("Workout not found: {0}")]
    UnknownWorkout(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct TrackerSettings {
    pub zoom: u8,
    pub tile_layer: TileLayer,
    pub storage_key: String,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            tile_layer: TileLayer::default(),
            storage_key: STORAGE_KEY.to_string(),
        }
    }
}

pub struct Tracker<M, S, G> {
    map: M,
    storage: S,
    geolocation: G,
    settings: TrackerSettings,
    map_loaded: bool,
    workouts: Vec<Workout>,
    entries: Vec<ListEntry>,
    pending_click: Option<Coords>,
    form: FormState,
    alert: Option<String>,
}

impl<M, S, G> Tracker<M, S, G>
where
    M: MapCapability,
    S: Storage,
    G: Geolocation,
{
    pub fn new(map: M, storage: S, geolocation: G, settings: TrackerSettings) -> Self {
        Self {
            map,
            storage,
            geolocation,
            settings,
            map_loaded: false,
            workouts: Vec::new(),
            entries: Vec::new(),
            pending_click: None,
            form: FormState::default(),
            alert: None,
        }
    }

    /// Restore persisted workouts, then ask for the current position once.
    ///
    /// Without a position the map stays unloaded and an alert is raised; the
    /// restored list is still rendered.
    pub async fn initialize(&mut self) -> Result<Coords, TrackerError> {
        self.restore();
        self.locate().await
    }

    /// Ask for the current position and load the map around it.
    pub async fn locate(&mut self) -> Result<Coords, TrackerError> {
        match self.geolocation.current_position().await {
            Ok(position) => {
                self.load_map(position);
                Ok(position)
            }
            Err(e) => {
                tracing::warn!("Geolocation failed: {}", e);
                self.alert = Some(POSITION_UNAVAILABLE_MESSAGE.to_string());
                Err(TrackerError::PositionUnavailable(e))
            }
        }
    }

    fn load_map(&mut self, position: Coords) {
        tracing::debug!("Loading map at {}, {}", position.lat, position.lng);

        self.map.initialize(position, self.settings.zoom);
        self.map.add_base_layer(self.settings.tile_layer.clone());
        let home = self.map.add_marker(position);
        self.map
            .bind_popup(home, PopupOptions::pinned("home-popup"), HOME_POPUP.to_string());
        self.map_loaded = true;

        for workout in &self.workouts {
            render_marker(&mut self.map, workout);
        }
    }

    fn restore(&mut self) {
        let raw = match self.storage.get(&self.settings.storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return,
            Err(e) => {
                tracing::warn!("Could not read stored workouts: {}", e);
                return;
            }
        };

        self.workouts = restore_workouts(&raw);
        self.entries = self.workouts.iter().map(ListEntry::from_workout).collect();
        tracing::info!("Restored {} workouts", self.workouts.len());
    }

    pub fn handle_map_click(&mut self, coords: Coords) -> Result<(), TrackerError> {
        if !self.map_loaded {
            return Err(TrackerError::MapNotLoaded);
        }
        if !coords.is_finite() {
            return Err(TrackerError::InvalidCoordinates);
        }

        self.pending_click = Some(coords);
        self.form.visible = true;
        self.form.focus_distance = true;
        Ok(())
    }

    pub fn toggle_form_fields(&mut self, kind: WorkoutType) {
        self.form.values.kind = kind;
    }

    pub fn submit_workout(&mut self, form: WorkoutForm) -> Result<&Workout, TrackerError> {
        self.submit_workout_at(form, Utc::now())
    }

    /// Validate the form and record a workout at the pending click.
    ///
    /// Rejected input leaves the list and storage untouched and keeps the form
    /// open with the entered values. The list is only extended once the new
    /// list has been written to storage.
    pub fn submit_workout_at(
        &mut self,
        form: WorkoutForm,
        now: DateTime<Utc>,
    ) -> Result<&Workout, TrackerError> {
        let coords = self.pending_click.ok_or(TrackerError::NoPendingClick)?;

        let input = match form.validate() {
            Ok(input) => input,
            Err(e) => {
                tracing::debug!("Rejected workout form: {:?}", form);
                self.form.values = form;
                self.form.visible = true;
                self.alert = Some(e.to_string());
                return Err(e.into());
            }
        };

        let id = self.next_id(now);
        let workout = match input {
            WorkoutInput::Running {
                distance,
                duration,
                cadence,
            } => Workout::running(id, now, coords, distance, duration, cadence),
            WorkoutInput::Cycling {
                distance,
                duration,
                elevation_gain,
            } => Workout::cycling(id, now, coords, distance, duration, elevation_gain),
        };

        let mut candidate: Vec<&Workout> = self.workouts.iter().collect();
        candidate.push(&workout);
        let raw = serde_json::to_string(&candidate)?;
        if let Err(e) = self.storage.set(&self.settings.storage_key, &raw) {
            tracing::warn!("Could not save workouts: {}", e);
            self.form.values = form;
            return Err(e.into());
        }
        tracing::info!("Logged workout {} ({})", workout.id(), workout.description());

        render_marker(&mut self.map, &workout);
        self.entries.push(ListEntry::from_workout(&workout));
        self.workouts.push(workout);

        self.form.hide();
        self.pending_click = None;

        let index = self.workouts.len() - 1;
        Ok(&self.workouts[index])
    }

    /// Pan to a listed workout and count the interaction.
    pub fn select_workout(&mut self, id: &str) -> Result<&Workout, TrackerError> {
        let workout = self
            .workouts
            .iter_mut()
            .find(|w| w.id() == id)
            .ok_or_else(|| TrackerError::UnknownWorkout(id.to_string()))?;

        if self.map_loaded {
            self.map.set_view(
                workout.coords(),
                self.settings.zoom,
                ViewOptions::animated(PAN_DURATION_SECS),
            );
        }
        workout.click();

        Ok(workout)
    }

    /// Wipe storage and drop all in-memory and rendered state.
    ///
    /// Follow with [`Tracker::locate`] to bring the map back, as a page
    /// reload would.
    pub fn clear(&mut self) -> Result<(), TrackerError> {
        self.storage.remove(&self.settings.storage_key)?;
        tracing::info!("Cleared stored workouts");

        self.map.reset();
        self.map_loaded = false;
        self.workouts.clear();
        self.entries.clear();
        self.pending_click = None;
        self.form = FormState::default();
        self.alert = None;
        Ok(())
    }

    /// Time-based id, bumped by a millisecond until unique in this session.
    fn next_id(&self, now: DateTime<Utc>) -> String {
        let mut millis = now.timestamp_millis();
        loop {
            let digits = millis.to_string();
            let id = digits[digits.len().saturating_sub(ID_DIGITS)..].to_string();
            if !self.workouts.iter().any(|w| w.id() == id) {
                return id;
            }
            millis += 1;
        }
    }

    pub fn take_alert(&mut self) -> Option<String> {
        self.alert.take()
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn entries(&self) -> &[ListEntry] {
        &self.entries
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn pending_click(&self) -> Option<Coords> {
        self.pending_click
    }

    pub fn is_map_loaded(&self) -> bool {
        self.map_loaded
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

fn render_marker<M: MapCapability>(map: &mut M, workout: &Workout) {
    let marker = map.add_marker(workout.coords());
    map.bind_popup(
        marker,
        PopupOptions::pinned(format!("{}-popup", workout.kind().as_str())),
        popup_content(workout),
    );
}
