use std::sync::Arc;
use std::thread;

use savitar_core::{into_records, Error, MetadataFilter, Store, StoreConfig, VectorRecord};

fn sample_store(partitions: usize) -> Store {
    let store = Store::with_partitions(partitions).unwrap();
    store
        .add_vectors(vec![
            VectorRecord::new("vec1", vec![1.0, 2.0, 3.0]).with_field("category", "image"),
            VectorRecord::new("vec2", vec![4.0, 5.0, 6.0]).with_field("category", "text"),
            VectorRecord::new("vec3", vec![7.0, 8.0, 9.0]).with_field("category", "image"),
        ])
        .unwrap();
    store
}

#[test]
fn test_filtered_search_scenario_for_any_partition_count() {
    for partitions in 1..=8 {
        let store = sample_store(partitions);
        let filter = MetadataFilter::new().eq("category", "image");
        let hits = store.search_vectors(&[1.0, 2.0, 3.5], 2, &filter).unwrap();

        let ids: Vec<String> = into_records(hits).into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["vec1", "vec3"], "partitions = {partitions}");
    }
}

#[test]
fn test_unfiltered_search_returns_fewer_than_top_n() {
    let store = sample_store(4);
    let hits = store
        .search_vectors(&[1.0, 2.0, 3.5], 10, &MetadataFilter::new())
        .unwrap();
    assert_eq!(hits.len(), 3);
}

#[test]
fn test_filter_on_missing_key_returns_nothing() {
    let store = sample_store(4);
    let filter = MetadataFilter::new().eq("owner", "alice");
    let hits = store.search_vectors(&[1.0, 2.0, 3.0], 3, &filter).unwrap();
    assert!(hits.is_empty());
}

#[test]
fn test_uniqueness_until_delete() {
    let store = sample_store(4);
    let record = VectorRecord::new("vec1", vec![0.0, 0.0, 1.0]);

    assert_eq!(
        store.add_vector(record.clone()),
        Err(Error::AlreadyExists("vec1".into()))
    );
    store.delete_vector("vec1").unwrap();
    store.add_vector(record.clone()).unwrap();
    assert_eq!(store.get_vector("vec1").unwrap(), record);
}

#[test]
fn test_one_bad_partition_fails_the_whole_search() {
    let store = Store::with_partitions(4).unwrap();
    for i in 0..40 {
        let data = vec![1.0, i as f64, 2.0];
        let record = VectorRecord::new(format!("good{i}"), data).with_field("kind", "good");
        store.add_vector(record).unwrap();
    }
    // A two-dimensional record lands in exactly one partition.
    store
        .add_vector(VectorRecord::new("short", vec![1.0, 1.0]))
        .unwrap();

    let result = store.search_vectors(&[1.0, 1.0, 1.0], 5, &MetadataFilter::new());
    assert_eq!(
        result,
        Err(Error::LengthMismatch {
            expected: 3,
            got: 2
        })
    );

    // Records excluded by the filter are never scored.
    let good = MetadataFilter::new().eq("kind", "good");
    let hits = store.search_vectors(&[1.0, 1.0, 1.0], 5, &good).unwrap();
    assert_eq!(hits.len(), 5);
}

#[test]
fn test_stored_zero_vector_fails_search() {
    let store = sample_store(2);
    store
        .add_vector(VectorRecord::new("zero", vec![0.0, 0.0, 0.0]))
        .unwrap();
    assert_eq!(
        store.search_vectors(&[1.0, 1.0, 1.0], 2, &MetadataFilter::new()),
        Err(Error::ZeroVector)
    );
}

#[test]
fn test_extreme_magnitudes_rank_by_direction() {
    let store = Store::with_partitions(3).unwrap();
    for (id, data) in [
        ("huge", vec![1e200, 1e200, 0.0]),
        ("tiny", vec![1e-200, 0.0, 0.0]),
        ("exact", vec![0.0, 0.0, 5.0]),
    ] {
        store.add_vector(VectorRecord::new(id, data)).unwrap();
    }

    let hits = store
        .search_vectors(&[0.0, 0.0, 1.0], 3, &MetadataFilter::new())
        .unwrap();
    let ids: Vec<&str> = hits.iter().map(|h| h.id()).collect();
    assert_eq!(ids, vec!["exact", "huge", "tiny"]);

    let scores: Vec<f64> = hits.iter().map(|h| h.similarity).collect();
    assert_eq!(scores, vec![1.0, 0.0, 0.0]);
}

#[test]
fn test_zero_query_fails_search() {
    let store = sample_store(2);
    assert_eq!(
        store.search_vectors(&[0.0, 0.0, 0.0], 2, &MetadataFilter::new()),
        Err(Error::ZeroVector)
    );
}

#[test]
fn test_concurrent_writers_and_searchers() {
    let store = Arc::new(Store::new(StoreConfig::new(4).with_dimension(4)).unwrap());

    let writers: Vec<_> = (0..4)
        .map(|w| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let tag = w.to_string();
                for i in 0..250 {
                    let id = format!("w{w}-{i}");
                    let data = vec![1.0 + w as f64, i as f64, 1.0, (i % 7) as f64];
                    let record = VectorRecord::new(id.clone(), data).with_field("writer", &tag);
                    store.add_vector(record).unwrap();
                    if i % 10 == 0 {
                        store.delete_vector(&id).unwrap();
                    }
                }
            })
        })
        .collect();

    let searchers: Vec<_> = (0..4)
        .map(|s| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let filter = MetadataFilter::new().eq("writer", s.to_string());
                for _ in 0..50 {
                    let hits = store
                        .search_vectors(&[1.0, 1.0, 1.0, 1.0], 5, &filter)
                        .unwrap();
                    assert!(hits.len() <= 5);
                    assert!(hits
                        .iter()
                        .all(|h| h.record.metadata.get("writer") == Some(s.to_string().as_str())));
                }
            })
        })
        .collect();

    for handle in writers.into_iter().chain(searchers) {
        handle.join().unwrap();
    }

    // 25 of each writer's 250 ids were deleted again.
    assert_eq!(store.len(), 4 * 225);
    assert_eq!(store.partition_sizes().iter().sum::<usize>(), store.len());
}
