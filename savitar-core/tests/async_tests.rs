#![cfg(feature = "async")]

use std::time::{Duration, Instant};

use savitar_core::{AsyncStore, Error, MetadataFilter, StoreConfig, VectorRecord};

fn tagged(id: &str, data: Vec<f64>, category: &str) -> VectorRecord {
    VectorRecord::new(id, data).with_field("category", category)
}

async fn sample_store(config: StoreConfig) -> AsyncStore {
    let store = AsyncStore::new(config).unwrap();
    store
        .add_vector(tagged("vec1", vec![1.0, 2.0, 3.0], "image"))
        .await
        .unwrap();
    store
        .add_vector(tagged("vec2", vec![4.0, 5.0, 6.0], "text"))
        .await
        .unwrap();
    store
        .add_vector(tagged("vec3", vec![7.0, 8.0, 9.0], "image"))
        .await
        .unwrap();
    store
}

#[tokio::test]
async fn test_async_search_scenario() {
    let store = sample_store(StoreConfig::new(4)).await;
    let filter = MetadataFilter::new().eq("category", "image");
    let hits = store
        .search_vectors(&[1.0, 2.0, 3.5], 2, filter)
        .await
        .unwrap();
    let ids: Vec<&str> = hits.iter().map(|h| h.id()).collect();
    assert_eq!(ids, vec!["vec1", "vec3"]);
}

#[tokio::test]
async fn test_async_matches_sync_search() {
    let store = AsyncStore::new(StoreConfig::new(5)).unwrap();
    let records: Vec<_> = (0..200)
        .map(|i| {
            let x = i as f64;
            VectorRecord::new(format!("v{i}"), vec![x.sin(), x.cos(), 0.5])
        })
        .collect();
    assert_eq!(store.add_vectors(records).await.unwrap(), 200);

    let query = [0.3, -0.7, 0.5];
    let async_hits = store
        .search_vectors(&query, 10, MetadataFilter::new())
        .await
        .unwrap();
    let sync_hits = store
        .inner()
        .search_vectors(&query, 10, &MetadataFilter::new())
        .unwrap();
    assert_eq!(async_hits, sync_hits);
}

#[tokio::test]
async fn test_async_crud() {
    let store = sample_store(StoreConfig::new(2)).await;
    assert_eq!(store.len(), 3);

    store
        .update_vector(VectorRecord::new("vec2", vec![0.0, 1.0, 0.0]))
        .await
        .unwrap();
    assert_eq!(
        store.get_vector("vec2").await.unwrap().data,
        vec![0.0, 1.0, 0.0]
    );

    store.delete_vector("vec2").await.unwrap();
    assert_eq!(
        store.get_vector("vec2").await,
        Err(Error::NotFound("vec2".into()))
    );
    assert_eq!(
        store
            .add_vector(VectorRecord::new("vec1", vec![1.0, 1.0, 1.0]))
            .await,
        Err(Error::AlreadyExists("vec1".into()))
    );
}

#[tokio::test]
async fn test_async_search_fails_fast() {
    let store = sample_store(StoreConfig::new(3)).await;
    store
        .add_vector(VectorRecord::new("short", vec![1.0]))
        .await
        .unwrap();
    let result = store
        .search_vectors(&[1.0, 2.0, 3.0], 2, MetadataFilter::new())
        .await;
    assert!(matches!(result, Err(Error::LengthMismatch { .. })));
}

#[tokio::test]
async fn test_async_search_invalid_arguments() {
    let store = sample_store(StoreConfig::new(2)).await;
    assert!(matches!(
        store
            .search_vectors(&[1.0, 2.0, 3.0], 0, MetadataFilter::new())
            .await,
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        store.search_vectors(&[], 1, MetadataFilter::new()).await,
        Err(Error::InvalidArgument(_))
    ));
}

#[tokio::test]
async fn test_async_search_within_deadline() {
    let config = StoreConfig::new(4).with_search_timeout(Duration::from_secs(30));
    let store = sample_store(config).await;
    let hits = store
        .search_vectors(&[1.0, 2.0, 3.5], 3, MetadataFilter::new())
        .await
        .unwrap();
    assert_eq!(hits.len(), 3);
}

#[tokio::test]
async fn test_async_search_timeout() {
    let deadline = Duration::from_millis(1);
    let config = StoreConfig::new(2).with_search_timeout(deadline);
    let store = AsyncStore::new(config).unwrap();
    let records: Vec<_> = (0..100_000)
        .map(|i| VectorRecord::new(format!("v{i}"), vec![1.0 + i as f64; 32]))
        .collect();
    store.add_vectors(records).await.unwrap();
    let query = [1.0; 32];

    // The assertion only holds if a full scan is well over the deadline.
    let started = Instant::now();
    store
        .inner()
        .search_vectors(&query, 5, &MetadataFilter::new())
        .unwrap();
    if started.elapsed() < deadline * 20 {
        return;
    }

    let result = store.search_vectors(&query, 5, MetadataFilter::new()).await;
    assert_eq!(result, Err(Error::Timeout(deadline)));
}
