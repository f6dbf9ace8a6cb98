use crate::{Metric, MetricSet, MetricSetError, Name, NameError, RawExercise, ReadError, StorageError};

pub trait ExerciseRepository {
    /// Returns `None` if no exercises have been stored yet.
    fn read_exercises(&self) -> Result<Option<Vec<RawExercise>>, ReadError>;
    fn write_exercises(&self, exercises: &[Exercise]) -> Result<(), StorageError>;
}

impl<T: ExerciseRepository + ?Sized> ExerciseRepository for &T {
    fn read_exercises(&self) -> Result<Option<Vec<RawExercise>>, ReadError> {
        (**self).read_exercises()
    }

    fn write_exercises(&self, exercises: &[Exercise]) -> Result<(), StorageError> {
        (**self).write_exercises(exercises)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    pub name: Name,
    pub metrics: MetricSet,
}

impl Exercise {
    pub fn new(name: &str, metrics: &[Metric]) -> Result<Self, ExerciseError> {
        Ok(Self {
            name: Name::new(name)?,
            metrics: MetricSet::new(metrics.iter().copied())?,
        })
    }
}

impl TryFrom<RawExercise> for Exercise {
    type Error = ExerciseError;

    fn try_from(value: RawExercise) -> Result<Self, Self::Error> {
        match value {
            RawExercise::Legacy(name) => Ok(Self {
                name: Name::new(&name)?,
                metrics: MetricSet::default(),
            }),
            RawExercise::Current { name, metrics } => Exercise::new(&name, &metrics),
        }
    }
}

impl From<&Exercise> for RawExercise {
    fn from(value: &Exercise) -> Self {
        RawExercise::Current {
            name: value.name.to_string(),
            metrics: value.metrics.to_vec(),
        }
    }
}

/// Outcome of an exercise update.
#[derive(Debug, Clone, PartialEq)]
pub enum ExerciseUpdate {
    Applied(Exercise),
    /// Metrics would be added to an exercise that already has workouts.
    ///
    /// The change is not applied. It has to be resolved by either applying the
    /// new metrics to future workouts only or by creating a separate variant.
    MetricsAdded(MetricChange),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricChange {
    pub exercise: Name,
    pub new_name: Name,
    pub metrics: MetricSet,
    pub added: Vec<Metric>,
}

#[derive(thiserror::Error, Debug)]
pub enum ExerciseError {
    #[error(transparent)]
    Name(#[from] NameError),
    #[error(transparent)]
    EmptyMetricSet(#[from] MetricSetError),
    #[error("An exercise named \"{0}\" already exists")]
    DuplicateName(Name),
    #[error("No exercise named \"{0}\"")]
    NotFound(Name),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
