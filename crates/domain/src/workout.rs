use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use derive_more::{Deref, Display};

use crate::{
    Ledger, Metric, MetricSet, MetricValue, Name, ReadError, Reps, StorageError, Time, Weight,
    WeightUnit,
};

pub trait WorkoutRepository {
    fn read_workouts(&self) -> Result<BTreeMap<Name, Vec<WorkoutRecord>>, ReadError>;
    fn write_workouts(&self, ledger: &Ledger) -> Result<(), StorageError>;
}

impl<T: WorkoutRepository + ?Sized> WorkoutRepository for &T {
    fn read_workouts(&self) -> Result<BTreeMap<Name, Vec<WorkoutRecord>>, ReadError> {
        (**self).read_workouts()
    }

    fn write_workouts(&self, ledger: &Ledger) -> Result<(), StorageError> {
        (**self).write_workouts(ledger)
    }
}

/// Raw user input per metric.
pub type FieldValues = BTreeMap<Metric, String>;

/// Identity of a workout within a ledger.
///
/// IDs are assigned in ascending order when a workout enters the ledger and
/// are not persisted.
#[derive(Deref, Display, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct WorkoutID(u64);

impl From<u64> for WorkoutID {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct WorkoutValues {
    pub reps: Option<Reps>,
    pub weight: Option<Weight>,
    pub time: Option<Time>,
}

impl WorkoutValues {
    /// Validate the inputs of all metrics in `metrics`.
    ///
    /// Invalid or missing inputs are ignored. An error is returned only if no
    /// valid value remains.
    pub fn parse(metrics: &MetricSet, input: &FieldValues) -> Result<Self, WorkoutError> {
        let mut values = Self::default();

        for metric in metrics.iter() {
            let Some(value) = input.get(metric).map(|v| v.trim()) else {
                continue;
            };
            if value.is_empty() {
                continue;
            }
            match metric {
                Metric::Reps => values.reps = Reps::try_from(value).ok(),
                Metric::Weight => values.weight = Weight::try_from(value).ok(),
                Metric::Time => values.time = Time::try_from(value).ok(),
            }
        }

        if values.is_empty() {
            return Err(WorkoutError::NoValidMetric);
        }

        Ok(values)
    }

    #[must_use]
    pub fn get(&self, metric: Metric) -> Option<MetricValue> {
        match metric {
            Metric::Reps => self.reps.map(MetricValue::Reps),
            Metric::Weight => self.weight.map(MetricValue::Weight),
            Metric::Time => self.time.map(MetricValue::Time),
        }
    }

    /// Present values in the order reps, weight, time.
    pub fn iter(&self) -> impl Iterator<Item = MetricValue> + '_ {
        [Metric::Reps, Metric::Weight, Metric::Time]
            .into_iter()
            .filter_map(|metric| self.get(metric))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reps.is_none() && self.weight.is_none() && self.time.is_none()
    }

    #[must_use]
    pub fn label(&self, unit: WeightUnit) -> String {
        self.iter()
            .map(|value| value.label(unit))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Workout as it is persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutRecord {
    pub date: DateTime<Utc>,
    pub exercise: Name,
    pub values: WorkoutValues,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    pub id: WorkoutID,
    pub date: DateTime<Utc>,
    pub exercise: Name,
    pub values: WorkoutValues,
}

impl Workout {
    #[must_use]
    pub fn new(id: WorkoutID, record: WorkoutRecord) -> Self {
        Self {
            id,
            date: record.date,
            exercise: record.exercise,
            values: record.values,
        }
    }
}

impl From<&Workout> for WorkoutRecord {
    fn from(value: &Workout) -> Self {
        Self {
            date: value.date,
            exercise: value.exercise.clone(),
            values: value.values,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum WorkoutError {
    #[error("Please enter valid values for at least one metric")]
    NoValidMetric,
    #[error("No exercise named \"{0}\"")]
    UnknownExercise(Name),
    #[error("Workout {0} not found")]
    NotFound(WorkoutID),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
