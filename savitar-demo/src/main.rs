use std::fs;

use savitar_core::{AsyncStore, Cluster, Error, MetadataFilter, Result, StoreConfig, VectorRecord};
use tracing_subscriber::EnvFilter;

/// Loads the store config from the JSON file named by the first argument,
/// or falls back to the defaults.
fn load_config() -> Result<StoreConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .map_err(|e| Error::Config(format!("read {} failed: {}", path, e)))?;
            StoreConfig::from_json(&content)
        }
        None => Ok(StoreConfig::default()),
    }
}

fn sample_vectors() -> Vec<VectorRecord> {
    vec![
        VectorRecord::new("vec1", vec![1.0, 2.0, 3.0]).with_field("category", "image"),
        VectorRecord::new("vec2", vec![4.0, 5.0, 6.0]).with_field("category", "text"),
        VectorRecord::new("vec3", vec![7.0, 8.0, 9.0]).with_field("category", "image"),
    ]
}

async fn run_store(config: StoreConfig) -> Result<()> {
    let store = AsyncStore::new(config)?;
    tracing::info!(partitions = store.partition_count(), "store ready");

    let inserted = store.add_vectors(sample_vectors()).await?;
    tracing::info!(inserted, "added sample vectors");

    let query = [1.0, 2.0, 3.5];
    let filter = MetadataFilter::new().eq("category", "image");
    let hits = store.search_vectors(&query, 2, filter).await?;

    println!("Top results:");
    for hit in &hits {
        println!(
            "ID: {}, Data: {:?}, Meta: {:?}, Similarity: {:.6}",
            hit.id(),
            hit.record.data,
            hit.record.metadata,
            hit.similarity
        );
    }
    Ok(())
}

fn run_cluster() -> Result<()> {
    let cluster = Cluster::new(3, 1)?;
    for (id, data, kind) in [
        ("vec1", vec![1.0, 2.0, 3.0], "image"),
        ("vec2", vec![4.0, 5.0, 6.0], "text"),
    ] {
        cluster.add_vector(VectorRecord::new(id, data).with_field("type", kind))?;
    }

    let retrieved = cluster.get_vector("vec1")?;
    tracing::info!(node = cluster.node_for("vec1")?.id(), "retrieved vec1");
    println!("Retrieved vector: {:?}", retrieved);
    Ok(())
}

async fn run() -> Result<()> {
    let config = load_config()?;
    run_store(config).await?;
    run_cluster()
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "demo failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
