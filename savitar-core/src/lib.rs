//! # Savitar Core
//!
//! Core library for Savitar, a sharded, in-memory vector store with
//! concurrent top-K cosine similarity search.
//!
//! ## Crate Features
//!
//! - `async` - Enables [`AsyncStore`] for tokio-compatible async operations
//!
//! ## Core Types
//!
//! ### Storage
//!
//! - [`Partition`] - One independently locked shard of records
//! - [`PartitionRouter`] - Deterministic id-to-partition hashing
//! - [`Store`] - Fixed set of partitions with CRUD and fan-out search
//! - [`AsyncStore`] - Async wrapper for tokio compatibility (requires `async` feature)
//! - [`Cluster`] - In-process nodes, each owning a [`Store`]
//!
//! ### Search
//!
//! - [`MetadataFilter`] - Exact-match metadata conditions
//! - [`SearchHit`] - A record with its cosine similarity to the query
//! - [`similarity::cosine_similarity`] - The scoring function
//!
//! ### Types
//!
//! - [`VectorRecord`] - Id, feature data and metadata
//! - [`Metadata`] - String-to-string map attached to records

pub mod cluster;
pub mod error;
pub mod filter;
pub mod metadata;
pub mod partition;
pub mod router;
pub mod search;
pub mod similarity;
pub mod store;
pub mod vector;

// Re-exports for convenient access
pub use cluster::{Cluster, Node};
pub use error::{Error, Result};
pub use filter::MetadataFilter;
pub use metadata::Metadata;
pub use partition::{Partition, SearchHit};
pub use router::PartitionRouter;
pub use search::into_records;
pub use similarity::cosine_similarity;
#[cfg(feature = "async")]
pub use store::AsyncStore;
pub use store::{Store, StoreConfig};
pub use vector::{VectorId, VectorRecord};

/// Re-export commonly used types for convenience.
///
/// # Example
///
/// ```rust
/// use savitar_core::prelude::*;
///
/// let store = Store::new(StoreConfig::new(4)).unwrap();
/// let record = VectorRecord::new("a", vec![1.0, 2.0, 3.0]).with_field("key", "value");
/// store.add_vector(record).unwrap();
/// let hits = store.search_vectors(&[1.0, 2.0, 3.0], 1, &MetadataFilter::new()).unwrap();
/// assert_eq!(hits[0].id(), "a");
/// ```
pub mod prelude {
    pub use crate::{
        into_records, Cluster, Error, Metadata, MetadataFilter, Result, SearchHit, Store,
        StoreConfig, VectorRecord,
    };
    #[cfg(feature = "async")]
    pub use crate::AsyncStore;
}
