//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Cache-aside fetch:
//!     → breaker.rs (is the cache worth trying?)
//!     → cache call
//!     → On connectivity failure: breaker.rs (open for the cooldown)
//!     → upstream provider
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every cache and upstream call has a deadline
//! - No retries: a failed cache call falls back to upstream exactly once
//! - The breaker is process-local and injected, never a global

pub mod breaker;

pub use breaker::{is_backend_connectivity_error, AvailabilityBreaker};
