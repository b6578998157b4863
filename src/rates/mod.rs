//! Exchange-rate snapshots.
//!
//! # Data Flow
//! ```text
//! DiffService
//!     → dual.rs (today + yesterday, concurrently)
//!     → lookup.rs (RateSnapshotLookup through the cache-aside fetcher)
//!     → snapshot.rs (RateSnapshot, decoded from cache or upstream)
//! ```

pub mod dual;
pub mod lookup;
pub mod snapshot;

pub use dual::DualFetch;
pub use lookup::RateSnapshotLookup;
pub use snapshot::RateSnapshot;
