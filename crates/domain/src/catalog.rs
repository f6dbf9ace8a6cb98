use log::warn;

use crate::{Exercise, ExerciseError, Metric, MetricSet, Name};

pub const DEFAULT_EXERCISES: [&str; 3] = ["pushups", "pull-ups", "chin-ups"];

/// Exercise as found in storage or in an imported file.
///
/// Early versions stored exercises by name only.
#[derive(Debug, Clone, PartialEq)]
pub enum RawExercise {
    Legacy(String),
    Current { name: String, metrics: Vec<Metric> },
}

#[must_use]
pub fn needs_migration(raw: &[RawExercise]) -> bool {
    raw.iter().any(|e| matches!(e, RawExercise::Legacy(_)))
}

/// Convert legacy entries into the current structure tracking reps.
#[must_use]
pub fn migrate_legacy(raw: &[RawExercise]) -> Vec<RawExercise> {
    raw.iter()
        .map(|e| match e {
            RawExercise::Legacy(name) => RawExercise::Current {
                name: name.clone(),
                metrics: vec![Metric::Reps],
            },
            current @ RawExercise::Current { .. } => current.clone(),
        })
        .collect()
}

/// Ordered collection of exercises with unique names.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Catalog {
    exercises: Vec<Exercise>,
}

impl Catalog {
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            exercises: DEFAULT_EXERCISES
                .iter()
                .filter_map(|name| Name::new(name).ok())
                .map(|name| Exercise {
                    name,
                    metrics: MetricSet::default(),
                })
                .collect(),
        }
    }

    /// Build a catalog from stored entries, skipping invalid and duplicate ones.
    #[must_use]
    pub fn from_raw(raw: &[RawExercise]) -> Self {
        let mut catalog = Self::default();

        for entry in migrate_legacy(raw) {
            match Exercise::try_from(entry) {
                Ok(exercise) => {
                    if let Err(err) = catalog.add(exercise) {
                        warn!("skipped exercise: {err}");
                    }
                }
                Err(err) => warn!("skipped invalid exercise: {err}"),
            }
        }

        catalog
    }

    #[must_use]
    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    #[must_use]
    pub fn get(&self, name: &Name) -> Option<&Exercise> {
        self.exercises.iter().find(|e| e.name == *name)
    }

    #[must_use]
    pub fn contains(&self, name: &Name) -> bool {
        self.get(name).is_some()
    }

    /// Metrics tracked for an exercise, reps for unknown exercises.
    #[must_use]
    pub fn metrics(&self, name: &Name) -> MetricSet {
        self.get(name)
            .map(|e| e.metrics.clone())
            .unwrap_or_default()
    }

    pub fn add(&mut self, exercise: Exercise) -> Result<(), ExerciseError> {
        if self.contains(&exercise.name) {
            return Err(ExerciseError::DuplicateName(exercise.name));
        }
        self.exercises.push(exercise);
        Ok(())
    }

    /// Replace the exercise `name` in place, keeping its position.
    pub fn replace(&mut self, name: &Name, exercise: Exercise) -> Result<(), ExerciseError> {
        if exercise.name != *name && self.contains(&exercise.name) {
            return Err(ExerciseError::DuplicateName(exercise.name));
        }
        let Some(entry) = self.exercises.iter_mut().find(|e| e.name == *name) else {
            return Err(ExerciseError::NotFound(name.clone()));
        };
        *entry = exercise;
        Ok(())
    }
}
