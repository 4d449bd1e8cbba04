use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A geographic point, stored on the wire as `[lat, lng]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coords {
    pub lat: f64,
    pub lng: f64,
}

impl Coords {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

impl From<[f64; 2]> for Coords {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<Coords> for [f64; 2] {
    fn from(coords: Coords) -> Self {
        [coords.lat, coords.lng]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutType {
    #[default]
    Running,
    Cycling,
}

impl WorkoutType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutType::Running => "running",
            WorkoutType::Cycling => "cycling",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "running" => Some(WorkoutType::Running),
            "cycling" => Some(WorkoutType::Cycling),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WorkoutType::Running => "Running",
            WorkoutType::Cycling => "Cycling",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            WorkoutType::Running => "🏃‍♂️",
            WorkoutType::Cycling => "🚴‍♀️",
        }
    }
}

/// Variant-specific fields. The derived metric is computed once on construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Activity {
    Running {
        cadence: f64,
        pace: f64,
    },
    Cycling {
        #[serde(rename = "elevationGain")]
        elevation_gain: f64,
        speed: f64,
    },
}

impl Activity {
    pub fn kind(&self) -> WorkoutType {
        match self {
            Activity::Running { .. } => WorkoutType::Running,
            Activity::Cycling { .. } => WorkoutType::Cycling,
        }
    }
}

/// Restored workouts go through [`super::StoredWorkout`], which rebuilds the
/// variant from its `type` tag instead of trusting the stored derived fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Workout {
    id: String,
    date: DateTime<Utc>,
    coords: Coords,
    distance: f64,
    duration: f64,
    clicks: u32,
    description: String,
    #[serde(flatten)]
    activity: Activity,
}

impl Workout {
    /// Build a running workout. Pace is minutes per kilometer.
    pub fn running(
        id: String,
        date: DateTime<Utc>,
        coords: Coords,
        distance: f64,
        duration: f64,
        cadence: f64,
    ) -> Self {
        let pace = duration / distance;
        Self::build(
            id,
            date,
            coords,
            distance,
            duration,
            Activity::Running { cadence, pace },
        )
    }

    /// Build a cycling workout. Speed is kilometers per hour.
    pub fn cycling(
        id: String,
        date: DateTime<Utc>,
        coords: Coords,
        distance: f64,
        duration: f64,
        elevation_gain: f64,
    ) -> Self {
        let speed = distance / duration * 60.0;
        Self::build(
            id,
            date,
            coords,
            distance,
            duration,
            Activity::Cycling {
                elevation_gain,
                speed,
            },
        )
    }

    fn build(
        id: String,
        date: DateTime<Utc>,
        coords: Coords,
        distance: f64,
        duration: f64,
        activity: Activity,
    ) -> Self {
        let description = describe(activity.kind(), &date);
        Self {
            id,
            date,
            coords,
            distance,
            duration,
            clicks: 0,
            description,
            activity,
        }
    }

    pub fn click(&mut self) {
        self.clicks = self.clicks.saturating_add(1);
    }

    pub(super) fn with_clicks(mut self, clicks: u32) -> Self {
        self.clicks = clicks;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn coords(&self) -> Coords {
        self.coords
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn clicks(&self) -> u32 {
        self.clicks
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn activity(&self) -> &Activity {
        &self.activity
    }

    pub fn kind(&self) -> WorkoutType {
        self.activity.kind()
    }

    /// Pace for running, speed for cycling.
    pub fn metric(&self) -> f64 {
        match self.activity {
            Activity::Running { pace, .. } => pace,
            Activity::Cycling { speed, .. } => speed,
        }
    }

    pub fn metric_unit(&self) -> &'static str {
        match self.activity {
            Activity::Running { .. } => "min/km",
            Activity::Cycling { .. } => "km/h",
        }
    }
}

/// `"Running on April 14"`, using the UTC calendar date.
pub fn describe(kind: WorkoutType, date: &DateTime<Utc>) -> String {
    format!(
        "{} on {} {}",
        kind.label(),
        MONTHS[date.month0() as usize],
        date.day()
    )
}
