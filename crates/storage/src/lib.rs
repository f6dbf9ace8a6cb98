#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

use std::collections::VecDeque;

use repbook_domain::{
    self as domain, ExerciseRepository, ReadError, StorageError, WorkoutRepository,
};
use repbook_web_app::{Settings, SettingsRepository, log};
use serde::{Serialize, de::DeserializeOwned};

pub mod backup;
#[allow(clippy::module_name_repetitions)]
pub mod local_storage;
pub mod memory;
pub mod schema;

pub const KEY_EXERCISES: &str = "exercises";
pub const KEY_WORKOUTS: &str = "workoutData";
pub const KEY_SETTINGS: &str = "settings";
pub const KEY_LOG: &str = "log";

/// Persistent storage of JSON values by key.
#[allow(clippy::missing_errors_doc)]
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>, Error>;
    fn set(&self, key: &str, value: serde_json::Value) -> Result<(), Error>;
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

impl From<Error> for ReadError {
    fn from(value: Error) -> Self {
        match value {
            Error::Unavailable(_) => ReadError::Storage(StorageError::Unavailable),
            Error::Serde(err) => ReadError::Other(Box::new(err)),
        }
    }
}

impl From<Error> for StorageError {
    fn from(value: Error) -> Self {
        match value {
            Error::Unavailable(_) => StorageError::Unavailable,
            Error::Serde(err) => StorageError::Other(Box::new(err)),
        }
    }
}

/// Repository of all application data on top of a key-value store.
pub struct Storage<S> {
    store: S,
}

impl<S: KeyValueStore> Storage<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, Error> {
        Ok(self
            .store
            .get(key)?
            .map(serde_json::from_value)
            .transpose()?)
    }

    fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<(), Error> {
        self.store.set(key, serde_json::to_value(value)?)
    }
}

impl<S: KeyValueStore> ExerciseRepository for Storage<S> {
    fn read_exercises(&self) -> Result<Option<Vec<domain::RawExercise>>, ReadError> {
        let exercises: Option<serde_json::Value> = self.read(KEY_EXERCISES)?;
        Ok(exercises.and_then(schema::exercises))
    }

    fn write_exercises(&self, exercises: &[domain::Exercise]) -> Result<(), StorageError> {
        Ok(self.write(
            KEY_EXERCISES,
            &exercises
                .iter()
                .map(schema::Exercise::from)
                .collect::<Vec<_>>(),
        )?)
    }
}

impl<S: KeyValueStore> WorkoutRepository for Storage<S> {
    fn read_workouts(
        &self,
    ) -> Result<std::collections::BTreeMap<domain::Name, Vec<domain::WorkoutRecord>>, ReadError>
    {
        let data: Option<serde_json::Value> = self.read(KEY_WORKOUTS)?;
        Ok(data.map(schema::records).unwrap_or_default())
    }

    fn write_workouts(&self, ledger: &domain::Ledger) -> Result<(), StorageError> {
        Ok(self.write(KEY_WORKOUTS, &schema::workout_data(ledger))?)
    }
}

impl<S: KeyValueStore> SettingsRepository for Storage<S> {
    fn read_settings(&self) -> Result<Settings, String> {
        self.read(KEY_SETTINGS)
            .map(Option::unwrap_or_default)
            .map_err(|err| err.to_string())
    }

    fn write_settings(&self, settings: Settings) -> Result<(), String> {
        self.write(KEY_SETTINGS, &settings)
            .map_err(|err| err.to_string())
    }
}

impl<S: KeyValueStore + Send + Sync + 'static> log::Repository for Storage<S> {
    fn read_entries(&self) -> Result<VecDeque<log::Entry>, log::Error> {
        self.read(KEY_LOG)
            .map(Option::unwrap_or_default)
            .map_err(|err| log::Error::Unknown(err.to_string()))
    }

    fn write_entry(&self, entry: log::Entry) -> Result<(), log::Error> {
        let mut entries = self.read_entries()?;
        entries.push_front(entry);
        entries.truncate(log::MAX_ENTRIES);
        self.write(KEY_LOG, &entries)
            .map_err(|err| log::Error::Unknown(err.to_string()))
    }
}
