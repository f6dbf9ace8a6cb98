use std::collections::BTreeMap;

use crate::{Name, RawExercise, StorageError, WorkoutRecord};

/// Content of an exported backup file.
#[derive(Debug, Clone, PartialEq)]
pub struct Backup {
    pub exercises: Vec<RawExercise>,
    pub workouts: BTreeMap<Name, Vec<WorkoutRecord>>,
    pub export_date: Option<String>,
    pub version: Option<String>,
}

impl Backup {
    #[must_use]
    pub fn preview(&self) -> ImportPreview {
        ImportPreview {
            exercises: self.exercises.len(),
            workouts: self.workouts.values().map(Vec::len).sum(),
            export_date: self.export_date.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportPreview {
    pub exercises: usize,
    pub workouts: usize,
    pub export_date: Option<String>,
}

/// An import replaces all data and therefore needs to be confirmed.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum ImportState {
    #[default]
    Idle,
    PendingConfirmation(Backup),
}

impl ImportState {
    #[must_use]
    pub fn preview(&self) -> Option<ImportPreview> {
        match self {
            ImportState::Idle => None,
            ImportState::PendingConfirmation(backup) => Some(backup.preview()),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ImportError {
    #[error("Invalid file format: {0}")]
    InvalidFormat(String),
    #[error("No import pending")]
    NothingPending,
    #[error(transparent)]
    Storage(#[from] StorageError),
}
