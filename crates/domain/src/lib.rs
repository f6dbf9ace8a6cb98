#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod catalog;
mod error;
mod exercise;
mod import;
mod ledger;
mod metric;
mod name;
mod service;
pub mod statistics;
mod workout;

pub use catalog::{Catalog, DEFAULT_EXERCISES, RawExercise};
pub use error::{ReadError, StorageError};
pub use exercise::{Exercise, ExerciseError, ExerciseRepository, ExerciseUpdate, MetricChange};
pub use import::{Backup, ImportError, ImportPreview, ImportState};
pub use ledger::Ledger;
pub use metric::{
    Metric, MetricSet, MetricSetError, MetricValue, Reps, RepsError, Time, TimeError, Weight,
    WeightError, WeightUnit,
};
pub use name::{Name, NameError};
pub use service::Service;
pub use statistics::Summary;
pub use workout::{
    FieldValues, Workout, WorkoutError, WorkoutID, WorkoutRecord, WorkoutRepository,
    WorkoutValues,
};
