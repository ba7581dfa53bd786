//! Cluster demo: ids routed to in-process nodes, searched across all of them.

use savitar::prelude::*;

fn main() -> Result<()> {
    println!("Savitar Cluster Demo\n");

    let cluster = Cluster::new(3, 2)?;

    for i in 0..12 {
        let x = i as f64;
        let record = VectorRecord::new(format!("vec{i}"), vec![x.cos(), x.sin(), 1.0])
            .with_field("type", if i % 3 == 0 { "image" } else { "text" });
        cluster.add_vector(record)?;
    }

    println!("Routing:");
    for i in 0..12 {
        let id = format!("vec{i}");
        println!("  {} -> {}", id, cluster.node_for(&id)?.id());
    }

    println!("\nNode sizes:");
    for node in cluster.nodes() {
        println!(
            "  {}: {} vectors {:?}",
            node.id(),
            node.store().len(),
            node.store().partition_sizes()
        );
    }

    let retrieved = cluster.get_vector("vec1")?;
    println!("\nRetrieved vector: {:?}", retrieved);

    let images = MetadataFilter::new().eq("type", "image");
    let hits = cluster.search_vectors(&[1.0, 0.0, 1.0], 3, &images)?;
    println!("\nTop 3 images:");
    for hit in &hits {
        println!("  {} (similarity: {:.4})", hit.id(), hit.similarity);
    }

    Ok(())
}
