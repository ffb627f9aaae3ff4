use super::{CacheError, CacheService};
use parking_lot::RwLock;
use std::{
    collections::{HashMap, hash_map::Entry},
    time::Duration,
};

///
/// MemoryCache
///
/// HashMap-backed reference implementation of the cache contract. Entries
/// live until deleted; the ttl hint is ignored because eviction policy
/// belongs to the host.
///

#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<(String, String), Vec<u8>>>,
}

impl MemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl CacheService for MemoryCache {
    fn get(&self, group: &str, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let entries = self.entries.read();
        Ok(entries.get(&(group.to_string(), key.to_string())).cloned())
    }

    fn set(
        &self,
        group: &str,
        key: &str,
        value: &[u8],
        _ttl: Option<Duration>,
    ) -> Result<(), CacheError> {
        self.entries
            .write()
            .insert((group.to_string(), key.to_string()), value.to_vec());
        Ok(())
    }

    fn add(&self, group: &str, key: &str, value: &[u8]) -> Result<bool, CacheError> {
        let mut entries = self.entries.write();
        match entries.entry((group.to_string(), key.to_string())) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(vacant) => {
                vacant.insert(value.to_vec());
                Ok(true)
            }
        }
    }

    fn delete(&self, group: &str, key: &str) -> Result<(), CacheError> {
        self.entries
            .write()
            .remove(&(group.to_string(), key.to_string()));
        Ok(())
    }
}
