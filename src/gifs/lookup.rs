//! Cache-aside lookups for GIF candidates and GIF bytes.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheAside, CacheKey, CacheResult, CacheStore, FetchError};
use crate::gifs::selector::CandidateSelector;
use crate::upstream::GifProvider;

/// Raw bytes of one GIF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GifAsset {
    pub id: String,
    pub content: Vec<u8>,
}

/// Picks one GIF id for a search query.
///
/// The cache holds the id set; a hit returns a random member straight from
/// the backend. On a miss the full id list comes from upstream, is added to
/// the set, and one id is chosen locally.
pub struct CandidateIdLookup {
    key: CacheKey,
    query: String,
    limit: u32,
    provider: Arc<dyn GifProvider>,
    selector: Arc<CandidateSelector>,
    ttl: Duration,
}

impl CandidateIdLookup {
    pub fn new(
        query: &str,
        limit: u32,
        provider: Arc<dyn GifProvider>,
        selector: Arc<CandidateSelector>,
        ttl: Duration,
    ) -> Self {
        Self {
            key: CacheKey::gif_ids(&normalize_query(query)),
            query: query.trim().to_string(),
            limit,
            provider,
            selector,
            ttl,
        }
    }
}

#[async_trait]
impl CacheAside for CandidateIdLookup {
    type Fetched = Vec<String>;
    type Output = String;
    const KIND: &'static str = "gif_ids";

    fn key(&self) -> &CacheKey {
        &self.key
    }

    async fn read(&self, store: &dyn CacheStore) -> CacheResult<Option<String>> {
        store.set_random_member(&self.key).await
    }

    async fn fetch(&self) -> Result<Vec<String>, FetchError> {
        Ok(self.provider.search_ids(&self.query, self.limit).await?)
    }

    async fn write(&self, store: &dyn CacheStore, fetched: &Vec<String>) -> CacheResult<()> {
        store.set_add(&self.key, fetched, self.ttl).await
    }

    fn resolve(&self, fetched: Vec<String>) -> Result<String, FetchError> {
        Ok(self.selector.pick(&fetched)?.clone())
    }
}

/// GIF bytes by id, cached forever.
pub struct GifAssetLookup {
    key: CacheKey,
    id: String,
    provider: Arc<dyn GifProvider>,
}

impl GifAssetLookup {
    pub fn new(id: &str, provider: Arc<dyn GifProvider>) -> Self {
        Self {
            key: CacheKey::gif(id),
            id: id.to_string(),
            provider,
        }
    }
}

#[async_trait]
impl CacheAside for GifAssetLookup {
    type Fetched = GifAsset;
    type Output = GifAsset;
    const KIND: &'static str = "gif";

    fn key(&self) -> &CacheKey {
        &self.key
    }

    async fn read(&self, store: &dyn CacheStore) -> CacheResult<Option<GifAsset>> {
        Ok(store.get_bytes(&self.key).await?.map(|content| GifAsset {
            id: self.id.clone(),
            content,
        }))
    }

    async fn fetch(&self) -> Result<GifAsset, FetchError> {
        let content = self.provider.fetch_gif(&self.id).await?;
        Ok(GifAsset {
            id: self.id.clone(),
            content,
        })
    }

    async fn write(&self, store: &dyn CacheStore, fetched: &GifAsset) -> CacheResult<()> {
        store.set_bytes(&self.key, &fetched.content, None).await
    }

    fn resolve(&self, fetched: GifAsset) -> Result<GifAsset, FetchError> {
        Ok(fetched)
    }
}

/// Search terms are keyed with spaces folded into `+`, as they appear in
/// a query string.
pub fn normalize_query(query: &str) -> String {
    query.trim().replace(' ', "+")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheAsideFetcher, MemoryStore};
    use crate::resilience::AvailabilityBreaker;
    use crate::upstream::{UpstreamError, UpstreamResult};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeTenor {
        ids: Vec<String>,
        searches: Mutex<Vec<String>>,
        downloads: AtomicUsize,
    }

    #[async_trait]
    impl GifProvider for FakeTenor {
        async fn search_ids(&self, query: &str, _limit: u32) -> UpstreamResult<Vec<String>> {
            self.searches.lock().unwrap().push(query.to_string());
            Ok(self.ids.clone())
        }

        async fn fetch_gif(&self, id: &str) -> UpstreamResult<Vec<u8>> {
            self.downloads.fetch_add(1, Ordering::SeqCst);
            if id == "missing" {
                return Err(UpstreamError::Status {
                    provider: "fake",
                    status: 404,
                });
            }
            Ok(format!("GIF:{id}").into_bytes())
        }
    }

    fn fetcher(store: Arc<MemoryStore>) -> CacheAsideFetcher {
        CacheAsideFetcher::new(store, Arc::new(AvailabilityBreaker::default()))
    }

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query("  so rich "), "so+rich");
        assert_eq!(normalize_query("broke"), "broke");
    }

    #[tokio::test]
    async fn test_candidate_ids_cached_as_set() {
        let store = Arc::new(MemoryStore::new());
        let tenor = Arc::new(FakeTenor {
            ids: vec!["a".into(), "b".into()],
            ..Default::default()
        });
        let lookup = CandidateIdLookup::new(
            "so rich",
            10,
            tenor.clone(),
            Arc::new(CandidateSelector::with_seed(1)),
            Duration::from_secs(86_400),
        );
        let fetcher = fetcher(store.clone());

        let first = fetcher.fetch(&lookup).await.unwrap();
        assert!(first == "a" || first == "b");
        assert_eq!(*tenor.searches.lock().unwrap(), vec!["so rich".to_string()]);

        for _ in 0..5 {
            let id = fetcher.fetch(&lookup).await.unwrap();
            assert!(id == "a" || id == "b");
        }
        assert_eq!(tenor.searches.lock().unwrap().len(), 1);
        assert!(store.ttl(&CacheKey::gif_ids("so+rich")).is_some());
    }

    #[tokio::test]
    async fn test_empty_search_is_error() {
        let tenor = Arc::new(FakeTenor::default());
        let lookup = CandidateIdLookup::new(
            "rich",
            10,
            tenor,
            Arc::new(CandidateSelector::new()),
            Duration::from_secs(60),
        );
        let err = fetcher(Arc::new(MemoryStore::new())).fetch(&lookup).await.unwrap_err();
        assert!(matches!(err, FetchError::EmptyCandidates(_)));
    }

    #[tokio::test]
    async fn test_asset_cached_forever() {
        let store = Arc::new(MemoryStore::new());
        let tenor = Arc::new(FakeTenor::default());
        let lookup = GifAssetLookup::new("abc", tenor.clone());
        let fetcher = fetcher(store.clone());

        let first = fetcher.fetch(&lookup).await.unwrap();
        let second = fetcher.fetch(&lookup).await.unwrap();
        assert_eq!(first.content, b"GIF:abc");
        assert_eq!(first, second);
        assert_eq!(tenor.downloads.load(Ordering::SeqCst), 1);
        assert!(store.ttl(&CacheKey::gif("abc")).is_none());
    }

    #[tokio::test]
    async fn test_failed_download_is_not_cached() {
        let store = Arc::new(MemoryStore::new());
        let tenor = Arc::new(FakeTenor::default());
        let lookup = GifAssetLookup::new("missing", tenor.clone());
        let fetcher = fetcher(store.clone());

        assert!(fetcher.fetch(&lookup).await.is_err());
        assert!(fetcher.fetch(&lookup).await.is_err());
        assert_eq!(tenor.downloads.load(Ordering::SeqCst), 2);
        assert_eq!(store.write_count(), 0);
    }
}
