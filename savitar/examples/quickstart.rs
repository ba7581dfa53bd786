//! Quick start example for Savitar.
//!
//! Builds a four-partition store, inserts a few records and runs a
//! filtered search.

use savitar::prelude::*;

fn main() -> Result<()> {
    println!("Savitar Quick Start Example\n");

    let store = Store::new(StoreConfig::new(4))?;

    let samples = vec![
        ("vec1", vec![1.0, 2.0, 3.0], "image"),
        ("vec2", vec![4.0, 5.0, 6.0], "text"),
        ("vec3", vec![7.0, 8.0, 9.0], "image"),
    ];

    println!("Inserting {} vectors...", samples.len());
    for (id, data, category) in samples {
        let record = VectorRecord::new(id, data).with_field("category", category);
        store.add_vector(record)?;
    }
    println!(
        "Store contains {} vectors {:?}\n",
        store.len(),
        store.partition_sizes()
    );

    let query = [1.0, 2.0, 3.5];
    let filter = MetadataFilter::new().eq("category", "image");
    let hits = store.search_vectors(&query, 2, &filter)?;

    println!("Top results:");
    println!("{:-<60}", "");
    for (rank, hit) in hits.iter().enumerate() {
        println!(
            "  {}. [ID: {}] {:?} (similarity: {:.4})",
            rank + 1,
            hit.id(),
            hit.record.data,
            hit.similarity
        );
    }
    println!("{:-<60}\n", "");

    // Duplicate ids are rejected
    if let Err(e) = store.add_vector(VectorRecord::new("vec1", vec![0.0, 0.0, 1.0])) {
        println!("Expected error: {}", e);
    }

    Ok(())
}
