//! In-process cache store.
//!
//! Mirrors the subset of Redis semantics the fetch paths rely on (hashes,
//! sets, byte strings, per-key expiry). It can be switched "unreachable" to
//! exercise the degraded path, and counts reads and writes.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry as Slot;
use dashmap::DashMap;
use rand::seq::IteratorRandom;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use crate::cache::error::{CacheError, CacheResult};
use crate::cache::keys::CacheKey;
use crate::cache::store::CacheStore;

#[derive(Debug, Clone)]
enum Value {
    Hash(HashMap<String, String>),
    Set(BTreeSet<String>),
    Bytes(Vec<u8>),
}

impl Value {
    fn type_name(&self) -> &'static str {
        match self {
            Value::Hash(_) => "hash",
            Value::Set(_) => "set",
            Value::Bytes(_) => "string",
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    value: Value,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| now < at)
    }
}

/// A thread-safe in-memory [`CacheStore`].
#[derive(Debug)]
pub struct MemoryStore {
    entries: DashMap<String, Entry>,
    reachable: AtomicBool,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create an empty, reachable store.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            reachable: AtomicBool::new(true),
            reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
        }
    }

    /// Simulate the backend going away (or coming back).
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    /// Number of read operations attempted, including failed ones.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of write operations attempted, including failed ones.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Remaining lifetime of a key, `None` if absent or persistent.
    pub fn ttl(&self, key: &CacheKey) -> Option<Duration> {
        let entry = self.entries.get(key.as_str())?;
        let now = Instant::now();
        entry
            .expires_at
            .filter(|_| entry.is_live(now))
            .map(|at| at.saturating_duration_since(now))
    }

    fn check_reachable(&self) -> CacheResult<()> {
        if self.reachable.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(CacheError::Connectivity("memory store marked unreachable".to_string()))
        }
    }

    fn before_read(&self) -> CacheResult<()> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.check_reachable()
    }

    fn before_write(&self) -> CacheResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.check_reachable()
    }

    /// Union `incoming` into the live value at `key` while holding the shard
    /// lock, or store it when the key is missing or expired. Refreshes the
    /// expiry like HSET/SADD followed by EXPIRE.
    fn merge_entry(&self, key: &CacheKey, incoming: Value, ttl: Duration) -> CacheResult<()> {
        let now = Instant::now();
        let expires_at = Some(now + ttl);

        match self.entries.entry(key.as_str().to_string()) {
            Slot::Vacant(slot) => {
                slot.insert(Entry {
                    value: incoming,
                    expires_at,
                });
            }
            Slot::Occupied(mut slot) => {
                let entry = slot.get_mut();
                if !entry.is_live(now) {
                    *entry = Entry {
                        value: incoming,
                        expires_at,
                    };
                    return Ok(());
                }
                match (&mut entry.value, incoming) {
                    (Value::Hash(existing), Value::Hash(fields)) => existing.extend(fields),
                    (Value::Set(existing), Value::Set(members)) => existing.extend(members),
                    (found, _) => return Err(wrong_type(key, found)),
                }
                entry.expires_at = expires_at;
            }
        }
        Ok(())
    }

    fn live_value(&self, key: &CacheKey) -> Option<Value> {
        let now = Instant::now();
        let expired = match self.entries.get(key.as_str()) {
            Some(entry) if entry.is_live(now) => return Some(entry.value.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            self.entries.remove(key.as_str());
        }
        None
    }
}

fn wrong_type(key: &CacheKey, found: &Value) -> CacheError {
    CacheError::Backend(format!(
        "WRONGTYPE key {} holds a {}",
        key,
        found.type_name()
    ))
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn hash_get_all(&self, key: &CacheKey) -> CacheResult<Option<HashMap<String, String>>> {
        self.before_read()?;
        match self.live_value(key) {
            None => Ok(None),
            Some(Value::Hash(fields)) => Ok(Some(fields)),
            Some(other) => Err(wrong_type(key, &other)),
        }
    }

    async fn hash_set_all(
        &self,
        key: &CacheKey,
        fields: &[(String, String)],
        ttl: Duration,
    ) -> CacheResult<()> {
        self.before_write()?;
        self.merge_entry(key, Value::Hash(fields.iter().cloned().collect()), ttl)
    }

    async fn set_add(&self, key: &CacheKey, members: &[String], ttl: Duration) -> CacheResult<()> {
        self.before_write()?;
        // Redis has no empty sets; SADD with no members is a no-op here too.
        if members.is_empty() {
            return Ok(());
        }
        self.merge_entry(key, Value::Set(members.iter().cloned().collect()), ttl)
    }

    async fn set_random_member(&self, key: &CacheKey) -> CacheResult<Option<String>> {
        self.before_read()?;
        match self.live_value(key) {
            None => Ok(None),
            Some(Value::Set(members)) => Ok(members.into_iter().choose(&mut rand::thread_rng())),
            Some(other) => Err(wrong_type(key, &other)),
        }
    }

    async fn get_bytes(&self, key: &CacheKey) -> CacheResult<Option<Vec<u8>>> {
        self.before_read()?;
        match self.live_value(key) {
            None => Ok(None),
            Some(Value::Bytes(bytes)) => Ok(Some(bytes)),
            Some(other) => Err(wrong_type(key, &other)),
        }
    }

    async fn set_bytes(&self, key: &CacheKey, value: &[u8], ttl: Option<Duration>) -> CacheResult<()> {
        self.before_write()?;
        self.entries.insert(
            key.as_str().to_string(),
            Entry {
                value: Value::Bytes(value.to_vec()),
                expires_at: ttl.map(|ttl| Instant::now() + ttl),
            },
        );
        Ok(())
    }

    async fn ping(&self) -> CacheResult<()> {
        self.check_reachable()
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
