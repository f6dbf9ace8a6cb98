use gloo_storage::Storage as GlooStorage;

use crate::{Error, KeyValueStore};

/// The browser's local storage.
pub struct LocalStorage;

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>, Error> {
        match gloo_storage::LocalStorage::get(key) {
            Ok(value) => Ok(Some(value)),
            Err(err) => match err {
                gloo_storage::errors::StorageError::KeyNotFound(_) => Ok(None),
                err => Err(err.into()),
            },
        }
    }

    fn set(&self, key: &str, value: serde_json::Value) -> Result<(), Error> {
        gloo_storage::LocalStorage::set(key, value).map_err(Error::from)
    }
}

impl From<gloo_storage::errors::StorageError> for Error {
    fn from(value: gloo_storage::errors::StorageError) -> Self {
        match value {
            gloo_storage::errors::StorageError::SerdeError(err) => Error::Serde(err),
            err => Error::Unavailable(err.to_string()),
        }
    }
}
