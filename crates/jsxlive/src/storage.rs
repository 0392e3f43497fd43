//! Persistence of the File Map in a string key-value store.
//!
//! The stored value is the File Map serialized as a JSON object, keyed by
//! filename, in map order.

use crate::error::StorageError;
use crate::project::ProjectFiles;

/// String key-value storage, e.g. the browser's `localStorage`.
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn insert(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for std::rc::Rc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn insert(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).insert(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Reads and writes the project under a fixed key.
pub struct ProjectStore<S> {
    storage: S,
    key: String,
}

impl<S: KeyValueStorage> ProjectStore<S> {
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn save(&self, files: &ProjectFiles) -> Result<(), StorageError> {
        let json = serde_json::to_string(files).map_err(StorageError::Serialize)?;
        self.storage.insert(&self.key, &json)
    }

    /// `Ok(None)` when nothing has been saved yet.
    pub fn load(&self) -> Result<Option<ProjectFiles>, StorageError> {
        let Some(json) = self.storage.get(&self.key)? else {
            return Ok(None);
        };
        serde_json::from_str(&json)
            .map(Some)
            .map_err(StorageError::Deserialize)
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::memory::MemoryStorage;

    #[test]
    fn test_load_missing_is_none() {
        let store = ProjectStore::new(MemoryStorage::new(), "k");
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_saved_json_is_plain_object_in_order() {
        let store = ProjectStore::new(MemoryStorage::new(), "k");
        let files: ProjectFiles = [("z.js", "z"), ("App.jsx", "app")].into_iter().collect();
        store.save(&files).unwrap();
        assert_eq!(
            store.storage().get("k").unwrap().as_deref(),
            Some(r#"{"z.js":"z","App.jsx":"app"}"#)
        );
        assert_eq!(store.load().unwrap(), Some(files));
    }

    #[test]
    fn test_corrupt_value_is_deserialize_error() {
        let storage = MemoryStorage::new();
        storage.insert("k", "{not json").unwrap();
        let store = ProjectStore::new(storage, "k");
        assert!(matches!(store.load(), Err(StorageError::Deserialize(_))));
    }

    #[test]
    fn test_clear_removes_value() {
        let store = ProjectStore::new(MemoryStorage::new(), "k");
        store.save(&ProjectFiles::new()).unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
