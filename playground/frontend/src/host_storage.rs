use jsxlive::error::StorageError;
use jsxlive::platform::browser::LocalStorage;
use jsxlive::platform::memory::MemoryStorage;
use jsxlive::storage::KeyValueStorage;
use zoon::eprintln;

/// `localStorage` when the browser allows it, otherwise an in-memory map that
/// lives as long as the page.
pub enum HostStorage {
    Local(LocalStorage),
    Memory(MemoryStorage),
}

impl HostStorage {
    pub fn detect() -> Self {
        match LocalStorage::new() {
            Ok(storage) => HostStorage::Local(storage),
            Err(error) => {
                eprintln!("localStorage unavailable, project will not survive a reload: {error}");
                HostStorage::Memory(MemoryStorage::new())
            }
        }
    }
}

impl KeyValueStorage for HostStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self {
            HostStorage::Local(storage) => storage.get(key),
            HostStorage::Memory(storage) => storage.get(key),
        }
    }

    fn insert(&self, key: &str, value: &str) -> Result<(), StorageError> {
        match self {
            HostStorage::Local(storage) => storage.insert(key, value),
            HostStorage::Memory(storage) => storage.insert(key, value),
        }
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match self {
            HostStorage::Local(storage) => storage.remove(key),
            HostStorage::Memory(storage) => storage.remove(key),
        }
    }
}
