use std::{collections::HashMap, sync::Mutex};

use crate::{Error, KeyValueStore};

/// Volatile key-value store.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, serde_json::Value>>,
    unavailable: bool,
}

impl MemoryStore {
    #[must_use]
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, serde_json::Value)>) -> Self {
        Self {
            entries: Mutex::new(
                entries
                    .into_iter()
                    .map(|(key, value)| (key.to_string(), value))
                    .collect(),
            ),
            unavailable: false,
        }
    }

    /// A store rejecting all writes.
    #[must_use]
    pub fn read_only(self) -> Self {
        Self {
            unavailable: true,
            ..self
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>, Error> {
        let entries = self
            .entries
            .lock()
            .map_err(|err| Error::Unavailable(err.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: serde_json::Value) -> Result<(), Error> {
        if self.unavailable {
            return Err(Error::Unavailable("read-only".to_string()));
        }
        let mut entries = self
            .entries
            .lock()
            .map_err(|err| Error::Unavailable(err.to_string()))?;
        entries.insert(key.to_string(), value);
        Ok(())
    }
}
