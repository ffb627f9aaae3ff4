mod memory;

pub use memory::MemoryCache;

use crate::types::Id;
use std::time::Duration;
use thiserror::Error as ThisError;

///
/// CacheError
///
/// Cache failures are advisory. Managers treat read errors as misses and
/// drop write errors, so an unavailable cache degrades the runtime to
/// store-only operation instead of failing requests.
///

#[derive(Debug, ThisError)]
pub enum CacheError {
    #[error("cache unavailable: {reason}")]
    Unavailable { reason: String },
}

///
/// CacheService
///
/// Group-scoped key/value contract. Managers partition the cache by group
/// so one entity type's churn cannot evict another's entries. `ttl` is a
/// hint; the reference implementation keeps entries until the host evicts
/// them.
///

pub trait CacheService: Send + Sync {
    fn get(&self, group: &str, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    fn set(
        &self,
        group: &str,
        key: &str,
        value: &[u8],
        ttl: Option<Duration>,
    ) -> Result<(), CacheError>;

    /// Set-if-absent. Returns false when the key already existed.
    fn add(&self, group: &str, key: &str, value: &[u8]) -> Result<bool, CacheError>;

    fn delete(&self, group: &str, key: &str) -> Result<(), CacheError>;
}

///
/// CacheKey
///
/// The one reviewable builder for every key format the runtime caches
/// under. Nothing else concatenates cache keys.
///

pub struct CacheKey;

impl CacheKey {
    /// Generation token, one per manager group.
    pub const LAST_CHANGED: &'static str = "last_changed";

    /// Hydrated entity row.
    #[must_use]
    pub fn entity(id: Id) -> String {
        format!("id:{id}")
    }

    /// One meta key of one owner.
    #[must_use]
    pub fn meta(owner: Id, key: &str) -> String {
        format!("meta:{owner}:{key}")
    }

    /// Cached query page: canonical argument fingerprint plus the
    /// generation current at build time. A later mutation bumps the
    /// generation, so a stale entry is simply never addressed again and
    /// ages out on its own.
    #[must_use]
    pub fn query(fingerprint: u64, generation: u64) -> String {
        format!("q:{fingerprint:016x}:{generation}")
    }
}

/// Encode a generation token for storage.
#[must_use]
pub fn encode_generation(generation: u64) -> Vec<u8> {
    generation.to_le_bytes().to_vec()
}

/// Decode a generation token; malformed payloads read as absent.
#[must_use]
pub fn decode_generation(bytes: &[u8]) -> Option<u64> {
    bytes.try_into().ok().map(u64::from_le_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_keys_embed_fingerprint_and_generation() {
        assert_eq!(CacheKey::query(0xAB, 3), "q:00000000000000ab:3");
        assert_ne!(CacheKey::query(0xAB, 3), CacheKey::query(0xAB, 4));
    }

    #[test]
    fn generation_round_trips_and_rejects_garbage() {
        assert_eq!(decode_generation(&encode_generation(42)), Some(42));
        assert_eq!(decode_generation(b"short"), None);
    }

    #[test]
    fn entity_and_meta_keys_are_distinct_namespaces() {
        let id = Id::new(5);
        assert_eq!(CacheKey::entity(id), "id:5");
        assert_eq!(CacheKey::meta(id, "color"), "meta:5:color");
    }
}
