//! # Savitar
//!
//! **A sharded in-memory vector store with concurrent top-K similarity search.**
//!
//! Savitar keeps vectors in a fixed number of independently locked
//! partitions and answers similarity queries by scanning every partition in
//! parallel:
//!
//! - **Exact search**: brute-force cosine similarity, no approximation
//! - **Metadata filters**: exact string matches on record metadata
//! - **Sharding**: deterministic id routing to one partition per record
//! - **In-process cluster**: nodes that each own a sharded store
//!
//! ## Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | **Partitioned storage** | Per-partition `RwLock`, writes never block other partitions |
//! | **Fan-out search** | One task per partition, merged into a global top-N |
//! | **Fail-fast** | Any partition error fails the whole search, no partial results |
//! | **Async API** | Tokio-compatible `AsyncStore` with search deadlines (feature flag) |
//!
//! ## Quick Start
//!
//! ```rust
//! use savitar::prelude::*;
//!
//! let store = Store::new(StoreConfig::new(4)).unwrap();
//!
//! for (id, data, category) in [
//!     ("vec1", vec![1.0, 2.0, 3.0], "image"),
//!     ("vec2", vec![4.0, 5.0, 6.0], "text"),
//!     ("vec3", vec![7.0, 8.0, 9.0], "image"),
//! ] {
//!     let record = VectorRecord::new(id, data).with_field("category", category);
//!     store.add_vector(record).unwrap();
//! }
//!
//! let filter = MetadataFilter::new().eq("category", "image");
//! let hits = store.search_vectors(&[1.0, 2.0, 3.5], 2, &filter).unwrap();
//!
//! assert_eq!(hits[0].id(), "vec1");
//! assert_eq!(hits[1].id(), "vec3");
//! ```
//!
//! ### Configuration
//!
//! ```rust
//! use savitar::prelude::*;
//!
//! let config = StoreConfig::from_json(r#"{
//!     "partition_count": 8,
//!     "dimension": 3,
//!     "validate_on_insert": true
//! }"#).unwrap();
//!
//! let store = Store::new(config).unwrap();
//! assert_eq!(store.partition_count(), 8);
//! assert!(store.add_vector(VectorRecord::new("short", vec![1.0])).is_err());
//! ```
//!
//! ### Cluster
//!
//! ```rust
//! use savitar::prelude::*;
//!
//! // 3 nodes, 2 partitions each
//! let cluster = Cluster::new(3, 2).unwrap();
//! cluster.add_vector(VectorRecord::new("vec1", vec![1.0, 0.0])).unwrap();
//!
//! let node = cluster.node_for("vec1").unwrap();
//! assert!(node.store().contains("vec1"));
//! ```
//!
//! ## Crate Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `async` | Enables `AsyncStore` for tokio compatibility |
//!
//! ## Architecture
//!
//! - **`savitar-core`**: Core library with no async runtime dependency
//! - **`savitar`**: Main crate that re-exports everything
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T>`](crate::Result), which uses
//! the [`Error`] enum for error types.
//!
//! ## Thread Safety
//!
//! - [`Store`] and [`Cluster`] are `Sync`; share them behind an `Arc`
//! - [`Partition`] locks internally; locks are never shared across partitions
//! - `AsyncStore` is `Clone` and safe to share across tasks

// Re-export everything from core
pub use savitar_core::*;
