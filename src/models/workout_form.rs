use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::workout::WorkoutType;

pub const INVALID_INPUT_MESSAGE: &str = "Inputs have to be positive numbers!";

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Inputs have to be positive numbers!")]
pub struct InvalidInput;

/// Raw values as typed into the entry form. Kept as text so a rejected
/// submission can be shown back to the user unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkoutForm {
    #[serde(rename = "type", default)]
    pub kind: WorkoutType,
    #[serde(default)]
    pub distance: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub cadence: String,
    #[serde(default)]
    pub elevation: String,
}

/// A form that passed validation, ready to become a [`super::Workout`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorkoutInput {
    Running {
        distance: f64,
        duration: f64,
        cadence: f64,
    },
    Cycling {
        distance: f64,
        duration: f64,
        elevation_gain: f64,
    },
}

/// Blank input counts as zero; anything else that is not a number is NaN.
pub fn coerce_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse().unwrap_or(f64::NAN)
}

fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

fn all_positive(values: &[f64]) -> bool {
    values.iter().all(|v| *v > 0.0)
}

impl WorkoutForm {
    pub fn running(distance: &str, duration: &str, cadence: &str) -> Self {
        Self {
            kind: WorkoutType::Running,
            distance: distance.to_string(),
            duration: duration.to_string(),
            cadence: cadence.to_string(),
            elevation: String::new(),
        }
    }

    pub fn cycling(distance: &str, duration: &str, elevation: &str) -> Self {
        Self {
            kind: WorkoutType::Cycling,
            distance: distance.to_string(),
            duration: duration.to_string(),
            cadence: String::new(),
            elevation: elevation.to_string(),
        }
    }

    /// Running requires all three numbers positive. Cycling requires elevation
    /// gain to be finite only, so flat or downhill rides are accepted.
    pub fn validate(&self) -> Result<WorkoutInput, InvalidInput> {
        let distance = coerce_number(&self.distance);
        let duration = coerce_number(&self.duration);

        match self.kind {
            WorkoutType::Running => {
                let cadence = coerce_number(&self.cadence);
                let values = [distance, duration, cadence];
                if !all_finite(&values) || !all_positive(&values) {
                    return Err(InvalidInput);
                }
                Ok(WorkoutInput::Running {
                    distance,
                    duration,
                    cadence,
                })
            }
            WorkoutType::Cycling => {
                let elevation_gain = coerce_number(&self.elevation);
                if !all_finite(&[distance, duration, elevation_gain])
                    || !all_positive(&[distance, duration])
                {
                    return Err(InvalidInput);
                }
                Ok(WorkoutInput::Cycling {
                    distance,
                    duration,
                    elevation_gain,
                })
            }
        }
    }
}
