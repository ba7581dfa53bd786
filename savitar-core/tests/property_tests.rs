use std::collections::HashSet;

use proptest::prelude::*;
use savitar_core::similarity::{cosine_similarity, norm};
use savitar_core::{MetadataFilter, PartitionRouter, SearchHit, Store, StoreConfig, VectorRecord};

const CATEGORIES: [&str; 3] = ["image", "text", "audio"];

/// Non-zero 3-dimensional vectors with an optional category.
fn records_strategy() -> impl Strategy<Value = Vec<(Vec<f64>, Option<usize>)>> {
    proptest::collection::vec(
        (
            proptest::collection::vec(-10.0f64..10.0f64, 3),
            proptest::option::of(0..CATEGORIES.len()),
        ),
        0..80,
    )
}

fn build_store(
    partitions: usize,
    records: &[(Vec<f64>, Option<usize>)],
) -> (Store, Vec<VectorRecord>) {
    let store = Store::new(StoreConfig::new(partitions)).unwrap();
    let mut stored = Vec::new();
    for (i, (data, category)) in records.iter().enumerate() {
        if norm(data) < 1e-6 {
            continue;
        }
        let mut record = VectorRecord::new(format!("vec{i}"), data.clone());
        if let Some(c) = category {
            record = record.with_field("category", CATEGORIES[*c]);
        }
        store.add_vector(record.clone()).unwrap();
        stored.push(record);
    }
    (store, stored)
}

/// Reference single-pass scan: score everything, sort, truncate.
fn brute_force(
    records: &[VectorRecord],
    query: &[f64],
    top_n: usize,
    filter: &MetadataFilter,
) -> Vec<String> {
    let mut scored: Vec<(String, f64)> = records
        .iter()
        .filter(|r| filter.matches(&r.metadata))
        .map(|r| (r.id.clone(), cosine_similarity(query, &r.data).unwrap()))
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    scored.truncate(top_n);
    scored.into_iter().map(|(id, _)| id).collect()
}

proptest! {
    #[test]
    fn test_similarity_within_bounds(
        pair in (1usize..32).prop_flat_map(|n| (
            proptest::collection::vec(-100.0f64..100.0f64, n),
            proptest::collection::vec(-100.0f64..100.0f64, n),
        ))
    ) {
        let (a, b) = pair;
        prop_assume!(norm(&a) > 1e-6 && norm(&b) > 1e-6);

        let s = cosine_similarity(&a, &b).unwrap();
        prop_assert!((-1.0..=1.0).contains(&s));

        let symmetric = cosine_similarity(&b, &a).unwrap();
        prop_assert!((s - symmetric).abs() < 1e-12);
    }

    #[test]
    fn test_self_similarity_is_one(a in proptest::collection::vec(-100.0f64..100.0f64, 1..64)) {
        prop_assume!(norm(&a) > 1e-6);
        let s = cosine_similarity(&a, &a).unwrap();
        prop_assert!((s - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_route_is_pure_and_in_range(id in ".*", partitions in 1usize..64, seed in any::<u64>()) {
        let router = PartitionRouter::with_seed(partitions, seed).unwrap();
        let first = router.route(&id);
        prop_assert!(first < partitions);
        prop_assert_eq!(first, router.route(&id));
        let rebuilt = PartitionRouter::with_seed(partitions, seed).unwrap();
        prop_assert_eq!(first, rebuilt.route(&id));
    }

    #[test]
    fn test_round_trip_and_uniqueness(
        partitions in 1usize..8,
        ids in proptest::collection::hash_set("[a-z0-9]{1,12}", 1..40),
    ) {
        let store = Store::with_partitions(partitions).unwrap();
        for (i, id) in ids.iter().enumerate() {
            let record = VectorRecord::new(id.clone(), vec![i as f64 + 1.0, 1.0])
                .with_field("n", i.to_string());
            store.add_vector(record.clone()).unwrap();
            prop_assert_eq!(store.get_vector(id).unwrap(), record.clone());
            prop_assert!(store.add_vector(record).is_err());
        }
        prop_assert_eq!(store.len(), ids.len());

        let stored: HashSet<String> = store.ids().into_iter().collect();
        prop_assert_eq!(&stored, &ids);
    }

    #[test]
    fn test_distributed_top_k_matches_brute_force(
        partitions in 1usize..8,
        records in records_strategy(),
        query in proptest::collection::vec(-10.0f64..10.0f64, 3),
        top_n in 1usize..20,
    ) {
        prop_assume!(norm(&query) > 1e-6);
        let (store, stored) = build_store(partitions, &records);
        let filter = MetadataFilter::new();

        let hits = store.search_vectors(&query, top_n, &filter).unwrap();
        let ids: Vec<String> = hits.iter().map(|h| h.id().to_string()).collect();

        prop_assert_eq!(ids, brute_force(&stored, &query, top_n, &filter));
        prop_assert!(hits.windows(2).all(|w| w[0].similarity >= w[1].similarity));
    }

    #[test]
    fn test_filtered_search_matches_brute_force(
        partitions in 1usize..8,
        records in records_strategy(),
        query in proptest::collection::vec(-10.0f64..10.0f64, 3),
        top_n in 1usize..20,
        category in 0..CATEGORIES.len(),
    ) {
        prop_assume!(norm(&query) > 1e-6);
        let (store, stored) = build_store(partitions, &records);
        let filter = MetadataFilter::new().eq("category", CATEGORIES[category]);

        let hits = store.search_vectors(&query, top_n, &filter).unwrap();
        prop_assert!(hits
            .iter()
            .all(|h: &SearchHit| h.record.metadata.get("category") == Some(CATEGORIES[category])));

        let ids: Vec<String> = hits.iter().map(|h| h.id().to_string()).collect();
        prop_assert_eq!(ids, brute_force(&stored, &query, top_n, &filter));
    }
}
