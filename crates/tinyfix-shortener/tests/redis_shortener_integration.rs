//! End-to-end allocation against a real Redis server.
//!
//! Ignored by default; run with `cargo test -p tinyfix-shortener -- --ignored`.

use std::sync::Arc;

use tinyfix_core::{LongUrl, ShortCode, Shortener};
use tinyfix_generator::{RandomGenerator, SeqGenerator};
use tinyfix_shortener::{AllocatorSettings, ShortenerService};
use tinyfix_storage::RedisStore;
use tinyfix_test_infra::{RedisConfig, RedisServer};

async fn start_store() -> (RedisServer, Arc<RedisStore>) {
    let redis = RedisServer::start(RedisConfig::builder().build())
        .await
        .expect("start redis");
    let conn = redis.connection().await.expect("redis connection");
    (redis, Arc::new(RedisStore::with_prefix(conn, "it:")))
}

fn url(s: &str) -> LongUrl {
    LongUrl::new(s).unwrap()
}

#[tokio::test]
#[ignore = "requires docker"]
async fn shorten_and_unshorten() {
    let (_redis, store) = start_store().await;
    let service =
        ShortenerService::with_settings(store, RandomGenerator::default(), Default::default());
    let long = url("https://example.com/some/page");

    let code = service.shorten(&long).await.unwrap();

    assert_eq!(service.shorten(&long).await.unwrap(), code);
    assert_eq!(service.unshorten(&code).await.unwrap(), Some(long));
    assert_eq!(
        service
            .unshorten(&ShortCode::new("ZZZZ").unwrap())
            .await
            .unwrap(),
        None
    );
}

#[tokio::test]
#[ignore = "requires docker"]
async fn services_sharing_redis_resolve_collisions() {
    let (_redis, store) = start_store().await;
    let first = ShortenerService::with_settings(
        Arc::clone(&store),
        SeqGenerator::new(),
        AllocatorSettings::default(),
    );
    let second = ShortenerService::with_settings(
        Arc::clone(&store),
        SeqGenerator::new(),
        AllocatorSettings::default(),
    );

    let a = first.shorten(&url("https://a.example")).await.unwrap();
    let b = second.shorten(&url("https://b.example")).await.unwrap();

    assert_eq!(a.as_str(), "----");
    assert_eq!(b.as_str(), "---_");
    assert_eq!(
        first.unshorten(&b).await.unwrap(),
        Some(url("https://b.example"))
    );
}

#[tokio::test]
#[ignore = "requires docker"]
async fn concurrent_shortens_of_one_url_agree() {
    let (_redis, store) = start_store().await;
    let mut handles = vec![];

    for i in 0..8u64 {
        let service = ShortenerService::with_settings(
            Arc::clone(&store),
            SeqGenerator::with_offset(i * 100),
            AllocatorSettings::default(),
        );
        handles.push(tokio::spawn(async move {
            service.shorten(&url("https://race.example")).await.unwrap()
        }));
    }

    let mut codes = vec![];
    for handle in handles {
        codes.push(handle.await.unwrap());
    }

    assert!(codes.windows(2).all(|pair| pair[0] == pair[1]));
}
