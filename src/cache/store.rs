//! Cache backend trait.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

use crate::cache::error::CacheResult;
use crate::cache::keys::CacheKey;

/// Key-value operations the fetch paths need from a cache backend.
///
/// Reads return `Ok(None)` when the key is absent. Connectivity problems
/// must surface as [`CacheError::Connectivity`](crate::cache::CacheError)
/// so the availability breaker can tell them apart from misses.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Read every field of a hash. `None` when the hash does not exist.
    async fn hash_get_all(&self, key: &CacheKey) -> CacheResult<Option<HashMap<String, String>>>;

    /// Write fields into a hash and (re)set its expiry.
    async fn hash_set_all(
        &self,
        key: &CacheKey,
        fields: &[(String, String)],
        ttl: Duration,
    ) -> CacheResult<()>;

    /// Add members to a set and (re)set its expiry.
    async fn set_add(&self, key: &CacheKey, members: &[String], ttl: Duration) -> CacheResult<()>;

    /// One random member of a set. `None` when the set does not exist.
    async fn set_random_member(&self, key: &CacheKey) -> CacheResult<Option<String>>;

    /// Raw bytes stored under a key.
    async fn get_bytes(&self, key: &CacheKey) -> CacheResult<Option<Vec<u8>>>;

    /// Store raw bytes; `ttl = None` keeps them forever.
    async fn set_bytes(&self, key: &CacheKey, value: &[u8], ttl: Option<Duration>) -> CacheResult<()>;

    /// Round trip to check the backend is reachable.
    async fn ping(&self) -> CacheResult<()>;

    /// Short backend name for logs and the health endpoint.
    fn backend_name(&self) -> &'static str;
}
