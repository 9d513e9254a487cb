use serde::{Serialize, de::DeserializeOwned};
use std::marker::PhantomData;
use std::rc::Rc;
use thiserror::Error;

use crate::database::{DatabaseError, Storage};

/// Storage key of the task collection
pub const TASKS_KEY: &str = "dailyWorkTracker_tasks";
/// Storage key of the diary collection
pub const DIARY_KEY: &str = "dailyWorkTracker_diary";
/// Storage key of the strengths/weaknesses table
pub const REFLECTIONS_KEY: &str = "strengthsWeaknesses";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] DatabaseError),
    #[error("Malformed stored JSON under '{key}': {source}")]
    Malformed {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to serialize '{key}': {source}")]
    Serialize {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// One JSON collection stored whole under a fixed key.
///
/// `load`/`save`/`clear` never fail towards the caller: storage and parse
/// errors are logged and degrade to an empty collection or a skipped write.
pub struct RecordStore<T> {
    storage: Rc<dyn Storage>,
    key: &'static str,
    _marker: PhantomData<T>,
}

impl<T> RecordStore<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    pub fn new(storage: Rc<dyn Storage>, key: &'static str) -> Self {
        Self {
            storage,
            key,
            _marker: PhantomData,
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Load the collection, `None` on first use
    pub fn try_load(&self) -> Result<Option<T>, StoreError> {
        let Some(raw) = self.storage.get_item(self.key)? else {
            return Ok(None);
        };
        let value = serde_json::from_str(&raw).map_err(|source| StoreError::Malformed {
            key: self.key,
            source,
        })?;
        Ok(Some(value))
    }

    pub fn try_save(&self, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string(value).map_err(|source| StoreError::Serialize {
            key: self.key,
            source,
        })?;
        self.storage.set_item(self.key, &json)?;
        Ok(())
    }

    pub fn load(&self) -> T {
        match self.try_load() {
            Ok(Some(value)) => value,
            Ok(None) => T::default(),
            Err(e) => {
                tracing::error!(key = self.key, error = %e, "error loading records, starting empty");
                T::default()
            }
        }
    }

    pub fn save(&self, value: &T) {
        if let Err(e) = self.try_save(value) {
            tracing::error!(key = self.key, error = %e, "error saving records");
        }
    }

    pub fn clear(&self) {
        if let Err(e) = self.storage.remove_item(self.key) {
            tracing::error!(key = self.key, error = %e, "error clearing records");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;
    use serde::Deserialize;

    #[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
    struct Row {
        name: String,
        count: u32,
    }

    fn storage() -> Rc<dyn Storage> {
        Rc::new(Database::in_memory().unwrap())
    }

    #[test]
    fn test_round_trip_preserves_order() {
        let store: RecordStore<Vec<Row>> = RecordStore::new(storage(), TASKS_KEY);
        let rows = vec![
            Row { name: "b".into(), count: 2 },
            Row { name: "a".into(), count: 1 },
            Row { name: "c".into(), count: 3 },
        ];

        store.save(&rows);
        assert_eq!(store.load(), rows);
    }

    #[test]
    fn test_first_use_is_empty() {
        let store: RecordStore<Vec<Row>> = RecordStore::new(storage(), DIARY_KEY);
        assert!(store.try_load().unwrap().is_none());
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_malformed_json_degrades_to_empty() {
        let storage = storage();
        storage.set_item(TASKS_KEY, "{not json").unwrap();
        let store: RecordStore<Vec<Row>> = RecordStore::new(storage, TASKS_KEY);

        assert!(matches!(store.try_load(), Err(StoreError::Malformed { .. })));
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_clear_removes_the_slot_only() {
        let storage = storage();
        let tasks: RecordStore<Vec<Row>> = RecordStore::new(storage.clone(), TASKS_KEY);
        let diary: RecordStore<Vec<Row>> = RecordStore::new(storage, DIARY_KEY);
        tasks.save(&vec![Row::default()]);
        diary.save(&vec![Row::default()]);

        tasks.clear();
        assert!(tasks.load().is_empty());
        assert_eq!(diary.load().len(), 1);
    }
}
