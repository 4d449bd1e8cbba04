//! Presentation state owned by the tracker: the entry form and the rendered
//! workout list.

use serde::Serialize;

use crate::models::{Activity, Workout, WorkoutForm, WorkoutType};

const DURATION_ICON: &str = "⏱";
const METRIC_ICON: &str = "⚡️";
const CADENCE_ICON: &str = "🦶🏼";
const ELEVATION_ICON: &str = "⛰";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormState {
    pub visible: bool,
    /// Whether the distance input takes focus when the page renders.
    pub focus_distance: bool,
    pub values: WorkoutForm,
}

impl FormState {
    pub fn kind(&self) -> WorkoutType {
        self.values.kind
    }

    pub fn shows_cadence(&self) -> bool {
        self.values.kind == WorkoutType::Running
    }

    pub fn shows_elevation(&self) -> bool {
        self.values.kind == WorkoutType::Cycling
    }

    /// Hide and clear all inputs. The selected type is kept.
    pub fn hide(&mut self) {
        let kind = self.values.kind;
        *self = Self::default();
        self.values.kind = kind;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailRow {
    pub icon: &'static str,
    pub value: String,
    pub unit: &'static str,
}

/// One rendered item of the workout list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListEntry {
    pub id: String,
    pub kind: &'static str,
    pub title: String,
    pub rows: Vec<DetailRow>,
}

impl ListEntry {
    /// Rows are distance, duration, then the two variant-specific rows.
    pub fn from_workout(workout: &Workout) -> Self {
        let mut rows = vec![
            DetailRow {
                icon: workout.kind().icon(),
                value: format_number(workout.distance()),
                unit: "km",
            },
            DetailRow {
                icon: DURATION_ICON,
                value: format_number(workout.duration()),
                unit: "min",
            },
            DetailRow {
                icon: METRIC_ICON,
                value: format!("{:.1}", workout.metric()),
                unit: workout.metric_unit(),
            },
        ];

        rows.push(match workout.activity() {
            Activity::Running { cadence, .. } => DetailRow {
                icon: CADENCE_ICON,
                value: format_number(*cadence),
                unit: "spm",
            },
            Activity::Cycling { elevation_gain, .. } => DetailRow {
                icon: ELEVATION_ICON,
                value: format_number(*elevation_gain),
                unit: "m",
            },
        });

        Self {
            id: workout.id().to_string(),
            kind: workout.kind().as_str(),
            title: workout.description().to_string(),
            rows,
        }
    }
}

/// Popup text shown on a workout's map marker.
pub fn popup_content(workout: &Workout) -> String {
    format!("{} {}", workout.kind().icon(), workout.description())
}

/// Whole numbers print without a fractional part: `5`, `2.5`.
pub fn format_number(value: f64) -> String {
    format!("{}", value)
}
