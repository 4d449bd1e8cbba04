pub mod stored_workout;
pub mod workout;
pub mod workout_form;

pub use stored_workout::{restore_workouts, RestoreError, StoredWorkout};
pub use workout::{Activity, Coords, Workout, WorkoutType};
pub use workout_form::{InvalidInput, WorkoutForm, WorkoutInput, INVALID_INPUT_MESSAGE};
