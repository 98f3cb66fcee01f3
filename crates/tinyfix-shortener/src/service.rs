use std::sync::Arc;

use async_trait::async_trait;
use tinyfix_core::{KvStore, LongUrl, ShortCode, Shortener};
use tinyfix_generator::Generator;

use crate::allocator::{Allocator, AllocatorSettings};
use crate::error::Result;
use crate::resolver::Resolver;

/// A concrete implementation of the `Shortener` trait.
///
/// Wraps one store handle, shared by the allocator and the resolver, so a
/// code returned by `shorten` is immediately visible to `unshorten`.
pub struct ShortenerService<S, G> {
    allocator: Allocator<S, G>,
    resolver: Resolver<S>,
}

impl<S: KvStore, G: Generator> ShortenerService<S, G> {
    /// Creates a service with unbounded allocation retries.
    pub fn new(store: S, generator: G) -> Self {
        Self::with_settings(Arc::new(store), generator, AllocatorSettings::default())
    }

    pub fn with_settings(store: Arc<S>, generator: G, settings: AllocatorSettings) -> Self {
        Self {
            resolver: Resolver::new(Arc::clone(&store)),
            allocator: Allocator::new(store, generator, settings),
        }
    }
}

#[async_trait]
impl<S: KvStore, G: Generator> Shortener for ShortenerService<S, G> {
    async fn shorten(&self, url: &LongUrl) -> Result<ShortCode> {
        self.allocator.allocate(url).await
    }

    async fn unshorten(&self, code: &ShortCode) -> Result<Option<LongUrl>> {
        self.resolver.resolve(code).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tinyfix_core::store::Result as StoreResult;
    use tinyfix_core::{ShortenerError, StorageError, StoreKey, Txn, TxnResponse, Versioned};
    use tinyfix_generator::{RandomGenerator, SeqGenerator};
    use tinyfix_storage::InMemoryStore;

    /// A store whose backend is never reachable.
    struct FailingStore;

    #[async_trait]
    impl KvStore for FailingStore {
        async fn get(&self, _key: &StoreKey) -> StoreResult<Option<Versioned>> {
            Err(StorageError::Unavailable("connection refused".into()))
        }

        async fn put(&self, _key: &StoreKey, _value: String) -> StoreResult<u64> {
            Err(StorageError::Unavailable("connection refused".into()))
        }

        async fn txn(&self, _txn: Txn) -> StoreResult<TxnResponse> {
            Err(StorageError::Unavailable("connection refused".into()))
        }
    }

    fn test_service() -> ShortenerService<InMemoryStore, RandomGenerator> {
        ShortenerService::new(InMemoryStore::new(), RandomGenerator::default())
    }

    fn url(s: &str) -> LongUrl {
        LongUrl::new(s).unwrap()
    }

    #[tokio::test]
    async fn shorten_then_unshorten() {
        let service = test_service();
        let long = url("https://example.com/some/long/path?q=1");

        let code = service.shorten(&long).await.unwrap();

        assert_eq!(service.unshorten(&code).await.unwrap(), Some(long));
    }

    #[tokio::test]
    async fn shorten_is_idempotent() {
        let service = test_service();
        let long = url("https://example.com");

        let first = service.shorten(&long).await.unwrap();
        let second = service.shorten(&long).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn different_urls_get_different_codes() {
        let service = test_service();

        let a = service.shorten(&url("https://example.com")).await.unwrap();
        let b = service.shorten(&url("https://example.com/")).await.unwrap();

        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn unshorten_unknown_code() {
        let service = test_service();

        let resolved = service
            .unshorten(&ShortCode::new("ZZZZ").unwrap())
            .await
            .unwrap();

        assert!(resolved.is_none());
    }

    #[tokio::test]
    async fn same_seed_services_collide_and_recover() {
        let store = Arc::new(InMemoryStore::new());
        let first = ShortenerService::with_settings(
            Arc::clone(&store),
            RandomGenerator::seeded(99),
            AllocatorSettings::default(),
        );
        let second = ShortenerService::with_settings(
            Arc::clone(&store),
            RandomGenerator::seeded(99),
            AllocatorSettings::default(),
        );

        let a = first.shorten(&url("https://a.example")).await.unwrap();
        let b = second.shorten(&url("https://b.example")).await.unwrap();

        assert_ne!(a, b);
        assert_eq!(
            first.unshorten(&b).await.unwrap(),
            Some(url("https://b.example"))
        );
        assert_eq!(
            second.unshorten(&a).await.unwrap(),
            Some(url("https://a.example"))
        );
    }

    #[tokio::test]
    async fn unavailable_store_is_reported() {
        let service = ShortenerService::new(FailingStore, SeqGenerator::new());

        let err = service
            .shorten(&url("https://example.com"))
            .await
            .unwrap_err();
        assert!(err.is_unavailable());
        assert!(matches!(
            err,
            ShortenerError::Storage(StorageError::Unavailable(_))
        ));

        let err = service
            .unshorten(&ShortCode::new("abcd").unwrap())
            .await
            .unwrap_err();
        assert!(err.is_unavailable());
    }

    #[tokio::test]
    async fn usable_as_trait_object() {
        let service: Arc<dyn Shortener> = Arc::new(test_service());
        let long = url("https://example.com");

        let code = service.shorten(&long).await.unwrap();

        assert_eq!(service.unshorten(&code).await.unwrap(), Some(long));
    }

    #[tokio::test]
    async fn mapping_pair_is_never_half_visible() {
        let store = Arc::new(InMemoryStore::new());
        let writer = ShortenerService::with_settings(
            Arc::clone(&store),
            SeqGenerator::new(),
            AllocatorSettings::default(),
        );
        let urls: Vec<_> = (0..200)
            .map(|i| url(&format!("https://example.com/{i}")))
            .collect();

        let reader = {
            let store = Arc::clone(&store);
            let urls = urls.clone();
            tokio::spawn(async move {
                let resolver = Resolver::new(Arc::clone(&store));
                let dedup = crate::dedup::DedupIndex::new(store);
                for _ in 0..5 {
                    // The writer never conflicts, so it hands out the sequence in order.
                    let codes = SeqGenerator::new();
                    for long in &urls {
                        let hash = tinyfix_core::ContentHash::of(long);
                        if let Some(code) = dedup.lookup(&hash).await.unwrap() {
                            assert_eq!(
                                resolver.resolve(&code).await.unwrap().as_ref(),
                                Some(long)
                            );
                        }

                        let code = codes.generate();
                        if let Some(resolved) = resolver.resolve(&code).await.unwrap() {
                            let hash = tinyfix_core::ContentHash::of(&resolved);
                            assert_eq!(dedup.lookup(&hash).await.unwrap(), Some(code));
                        }
                        tokio::task::yield_now().await;
                    }
                }
            })
        };

        for long in &urls {
            writer.shorten(long).await.unwrap();
            tokio::task::yield_now().await;
        }

        reader.await.unwrap();
        assert_eq!(store.len(), 400);
    }
}
