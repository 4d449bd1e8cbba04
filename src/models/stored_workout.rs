use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use super::workout::{Coords, Workout};

#[derive(Error, Debug, PartialEq)]
pub enum RestoreError {
    #[error("invalid {0}")]
    InvalidField(&'static str),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum StoredActivity {
    Running {
        cadence: f64,
    },
    Cycling {
        #[serde(rename = "elevationGain")]
        elevation_gain: f64,
    },
}

/// The scalar fields of a persisted workout. Derived fields (`pace`, `speed`,
/// `description`) are ignored on read and recomputed by [`StoredWorkout::restore`].
#[derive(Debug, Clone, Deserialize)]
pub struct StoredWorkout {
    id: String,
    date: DateTime<Utc>,
    coords: Coords,
    distance: f64,
    duration: f64,
    #[serde(default)]
    clicks: u32,
    #[serde(flatten)]
    activity: StoredActivity,
}

impl StoredWorkout {
    pub fn restore(self) -> Result<Workout, RestoreError> {
        if self.id.is_empty() {
            return Err(RestoreError::InvalidField("id"));
        }
        if !self.coords.is_finite() {
            return Err(RestoreError::InvalidField("coords"));
        }
        if !is_positive(self.distance) {
            return Err(RestoreError::InvalidField("distance"));
        }
        if !is_positive(self.duration) {
            return Err(RestoreError::InvalidField("duration"));
        }

        let workout = match self.activity {
            StoredActivity::Running { cadence } => {
                if !is_positive(cadence) {
                    return Err(RestoreError::InvalidField("cadence"));
                }
                Workout::running(
                    self.id,
                    self.date,
                    self.coords,
                    self.distance,
                    self.duration,
                    cadence,
                )
            }
            StoredActivity::Cycling { elevation_gain } => {
                if !elevation_gain.is_finite() {
                    return Err(RestoreError::InvalidField("elevationGain"));
                }
                Workout::cycling(
                    self.id,
                    self.date,
                    self.coords,
                    self.distance,
                    self.duration,
                    elevation_gain,
                )
            }
        };

        Ok(workout.with_clicks(self.clicks))
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Parse a persisted workout list.
///
/// Unparsable text or a non-array value yields an empty list. Individual
/// records that fail to parse or validate are skipped.
pub fn restore_workouts(raw: &str) -> Vec<Workout> {
    let records: Vec<serde_json::Value> = match serde_json::from_str(raw) {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!("Ignoring malformed workout list: {}", e);
            return Vec::new();
        }
    };

    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let stored = match serde_json::from_value::<StoredWorkout>(record) {
                Ok(stored) => stored,
                Err(e) => {
                    tracing::warn!("Skipping stored workout #{}: {}", index, e);
                    return None;
                }
            };
            match stored.restore() {
                Ok(workout) => Some(workout),
                Err(e) => {
                    tracing::warn!("Skipping stored workout #{}: {}", index, e);
                    None
                }
            }
        })
        .collect()
}
