//! Uniform random choice over candidate ids.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Picking from an empty candidate list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot pick from an empty candidate set")]
pub struct EmptyCandidateSet;

/// Shared random source, seeded once.
#[derive(Debug)]
pub struct CandidateSelector {
    rng: Mutex<StdRng>,
}

impl Default for CandidateSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl CandidateSelector {
    /// Seed from the wall clock.
    pub fn new() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        Self::with_seed(nanos as u64)
    }

    /// Deterministic selector for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Pick one element uniformly.
    pub fn pick<'a, T>(&self, candidates: &'a [T]) -> Result<&'a T, EmptyCandidateSet> {
        if candidates.is_empty() {
            return Err(EmptyCandidateSet);
        }
        let index = self
            .rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .gen_range(0..candidates.len());
        Ok(&candidates[index])
    }
}
