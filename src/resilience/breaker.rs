//! Cache availability breaker.
//!
//! # States
//! - Closed (available): cache reads are attempted
//! - Open (unavailable): the cache is skipped entirely, every fetch goes
//!   straight to the upstream provider
//!
//! # State Transitions
//! ```text
//! Closed → Open: a cache call fails with a connectivity error
//! Open → Closed: on the first availability check after the cooldown
//! ```
//!
//! # Design Decisions
//! - One breaker per cache backend, shared by every fetch path
//! - No background timer and no half-open probe: recovery is lazy and
//!   optimistic, the next real request is the probe
//! - A cache miss never trips the breaker

use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::cache::CacheError;

/// Default time the cache is bypassed after a connectivity failure.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(60);

#[derive(Debug)]
struct BreakerState {
    available: bool,
    last_failure_at: Option<Instant>,
}

/// Tracks whether the remote cache backend is worth talking to.
#[derive(Debug)]
pub struct AvailabilityBreaker {
    state: Mutex<BreakerState>,
    cooldown: Duration,
}

impl Default for AvailabilityBreaker {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN)
    }
}

impl AvailabilityBreaker {
    /// Create a closed breaker.
    pub fn new(cooldown: Duration) -> Self {
        Self {
            state: Mutex::new(BreakerState {
                available: true,
                last_failure_at: None,
            }),
            cooldown,
        }
    }

    /// Whether the cache should be tried right now.
    pub fn is_available(&self) -> bool {
        self.is_available_at(Instant::now())
    }

    /// Availability as seen at `now`. Re-closes the breaker once the
    /// cooldown has fully elapsed since the last failure.
    pub fn is_available_at(&self, now: Instant) -> bool {
        let mut state = self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if !state.available {
            let cooled_down = state
                .last_failure_at
                .map_or(true, |failed_at| now.saturating_duration_since(failed_at) > self.cooldown);
            if cooled_down {
                state.available = true;
                tracing::info!("Cache cooldown elapsed, re-enabling cache reads");
            }
        }
        state.available
    }

    /// Record a connectivity failure now.
    pub fn mark_unavailable(&self) {
        self.mark_unavailable_at(Instant::now());
    }

    /// Record a connectivity failure at `now`. Concurrent callers race;
    /// the last one wins.
    pub fn mark_unavailable_at(&self, now: Instant) {
        let mut state = self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if state.available {
            tracing::warn!(cooldown = ?self.cooldown, "Cache marked unavailable");
        }
        state.available = false;
        state.last_failure_at = Some(now);
    }
}

/// True when `err` means the cache could not be reached, as opposed to a
/// reachable cache answering with an error. Misses are not errors at all.
pub fn is_backend_connectivity_error(err: &CacheError) -> bool {
    matches!(err, CacheError::Connectivity(_))
}
