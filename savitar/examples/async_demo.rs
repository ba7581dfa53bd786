//! Async API demo using AsyncStore.
//!
//! Run with: cargo run --example async_demo --features async

#[cfg(feature = "async")]
use savitar::prelude::*;

#[cfg(feature = "async")]
#[tokio::main]
async fn main() {
    use std::time::Duration;

    println!("Async Savitar Demo\n");

    let config = StoreConfig::new(8).with_search_timeout(Duration::from_secs(1));
    let store = AsyncStore::new(config).expect("Failed to create store");

    // Insert vectors concurrently
    println!("Inserting 1000 vectors concurrently...");
    let start = std::time::Instant::now();

    let mut handles = vec![];
    for i in 0..1000 {
        let store = store.clone();
        let handle = tokio::spawn(async move {
            let data: Vec<f64> = (0..64).map(|j| ((i * 64 + j) as f64).sin()).collect();
            let record = VectorRecord::new(format!("vec{i}"), data)
                .with_field("category", if i % 2 == 0 { "even" } else { "odd" });
            store.add_vector(record).await
        });
        handles.push(handle);
    }

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    println!("   [OK] Inserted in {:?}", start.elapsed());
    println!("   Total vectors: {}\n", store.len());

    println!("Searching...");
    let query: Vec<f64> = (0..64).map(|i| (i as f64 * 0.1).cos()).collect();
    let hits = store
        .search_vectors(&query, 5, MetadataFilter::new().eq("category", "even"))
        .await
        .unwrap();

    println!("   Top 5 results:");
    for (i, hit) in hits.iter().enumerate() {
        println!(
            "     {}. {} (similarity: {:.4})",
            i + 1,
            hit.id(),
            hit.similarity
        );
    }

    println!("\nAsync demo complete!");
}

#[cfg(not(feature = "async"))]
fn main() {
    println!("Run with: cargo run --example async_demo --features async");
}
