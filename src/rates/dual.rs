//! Concurrent fetch of two cache-aside lookups.
//!
//! Both lookups always run to completion and both results are inspected
//! only after the join. When both fail, the error that arrived first wins;
//! under a race which one that is depends on scheduling.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::cache::{CacheAside, CacheAsideFetcher, FetchError};

/// Runs two lookups through one fetcher and joins them.
#[derive(Clone)]
pub struct DualFetch {
    fetcher: CacheAsideFetcher,
}

impl DualFetch {
    pub fn new(fetcher: CacheAsideFetcher) -> Self {
        Self { fetcher }
    }

    /// Fetch both lookups concurrently. Returns both values or an error,
    /// never one value alone.
    pub async fn fetch_pair<A, B>(&self, first: &A, second: &B) -> Result<(A::Output, B::Output), FetchError>
    where
        A: CacheAside,
        B: CacheAside,
    {
        let arrivals = AtomicUsize::new(0);
        let ((first_seq, first_result), (second_seq, second_result)) = tokio::join!(
            arrive(&arrivals, self.fetcher.fetch(first)),
            arrive(&arrivals, self.fetcher.fetch(second)),
        );

        match (first_result, second_result) {
            (Ok(a), Ok(b)) => Ok((a, b)),
            (Err(err), Ok(_)) | (Ok(_), Err(err)) => Err(err),
            (Err(first_err), Err(second_err)) => {
                let (reported, dropped) = if first_seq < second_seq {
                    (first_err, second_err)
                } else {
                    (second_err, first_err)
                };
                tracing::debug!(error = %dropped, "Both fetches failed, reporting the earlier error");
                Err(reported)
            }
        }
    }
}

/// Await `fut` and tag its output with its completion order.
async fn arrive<T>(arrivals: &AtomicUsize, fut: impl Future<Output = T>) -> (usize, T) {
    let output = fut.await;
    (arrivals.fetch_add(1, Ordering::SeqCst), output)
}
