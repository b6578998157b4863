//! Cache subsystem.
//!
//! # Data Flow
//! ```text
//! rates / gifs lookups
//!     → fetcher.rs (cache-aside algorithm, gated by the availability breaker)
//!     → store.rs (CacheStore trait)
//!         → redis.rs (production backend)
//!         → memory.rs (in-process backend)
//! ```
//!
//! # Design Decisions
//! - Keys are typed (keys.rs) so call sites cannot collide
//! - A miss is `Ok(None)`, never an error
//! - Connectivity errors are distinct from backend errors so only the
//!   former trip the breaker
//! - Write-back is best effort and never fails a fetch

pub mod error;
pub mod fetcher;
pub mod keys;
pub mod memory;
pub mod redis;
pub mod store;

pub use error::{CacheError, CacheResult, FetchError};
pub use fetcher::{CacheAside, CacheAsideFetcher};
pub use keys::CacheKey;
pub use memory::MemoryStore;
pub use self::redis::RedisStore;
pub use store::CacheStore;
