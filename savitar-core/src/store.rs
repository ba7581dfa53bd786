//! Sharded in-memory vector store.
//!
//! A `Store` owns a fixed set of partitions chosen at construction:
//! - point operations are routed by id to exactly one partition
//! - search fans out to every partition concurrently and merges the results
//! - all state is volatile and lives as long as the store

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::filter::MetadataFilter;
use crate::partition::{Partition, SearchHit};
use crate::router::PartitionRouter;
use crate::search;
use crate::vector::{VectorId, VectorRecord};

/// Configuration for a store.
///
/// Deserializes from JSON with every field optional:
///
/// ```
/// use savitar_core::StoreConfig;
///
/// let config = StoreConfig::from_json(r#"{ "partition_count": 8 }"#).unwrap();
/// assert_eq!(config.partition_count, 8);
/// assert!(config.validate_on_insert);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Number of partitions. Fixed for the lifetime of the store.
    pub partition_count: usize,
    /// Dimensionality enforced on writes, if set.
    pub dimension: Option<usize>,
    /// Reject empty or non-finite vectors on insert and update.
    pub validate_on_insert: bool,
    /// Seed mixed into the routing hash.
    pub routing_seed: u64,
    /// Deadline for async searches, in milliseconds.
    pub search_timeout_ms: Option<u64>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            partition_count: 4,
            dimension: None,
            validate_on_insert: true,
            routing_seed: 0,
            search_timeout_ms: None,
        }
    }
}

impl StoreConfig {
    /// Creates a config with the given partition count and defaults otherwise.
    pub fn new(partition_count: usize) -> Self {
        Self {
            partition_count,
            ..Self::default()
        }
    }

    /// Parses a JSON config document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("parse config failed: {}", e)))?;
        config.check()?;
        Ok(config)
    }

    /// Sets a fixed dimension. Chainable.
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = Some(dimension);
        self
    }

    /// Enables or disables write-time validation. Chainable.
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.validate_on_insert = enabled;
        self
    }

    /// Sets the routing seed. Chainable.
    pub fn with_routing_seed(mut self, seed: u64) -> Self {
        self.routing_seed = seed;
        self
    }

    /// Sets the async search deadline. Chainable.
    pub fn with_search_timeout(mut self, timeout: Duration) -> Self {
        self.search_timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    /// Returns the async search deadline, if any.
    pub fn search_timeout(&self) -> Option<Duration> {
        self.search_timeout_ms.map(Duration::from_millis)
    }

    fn check(&self) -> Result<()> {
        if self.partition_count == 0 {
            return Err(Error::NoPartitionAvailable);
        }
        if self.dimension == Some(0) {
            return Err(Error::Config("dimension must be greater than zero".into()));
        }
        Ok(())
    }
}

/// An in-memory vector store split into independently locked partitions.
///
/// `Store` is `Sync`; share it across threads behind an `Arc`.
///
/// # Example
///
/// ```
/// use savitar_core::{into_records, MetadataFilter, Store, StoreConfig, VectorRecord};
///
/// let store = Store::new(StoreConfig::new(4)).unwrap();
///
/// for (id, data, category) in [
///     ("vec1", vec![1.0, 2.0, 3.0], "image"),
///     ("vec2", vec![4.0, 5.0, 6.0], "text"),
///     ("vec3", vec![7.0, 8.0, 9.0], "image"),
/// ] {
///     let record = VectorRecord::new(id, data).with_field("category", category);
///     store.add_vector(record).unwrap();
/// }
///
/// let filter = MetadataFilter::new().eq("category", "image");
/// let hits = store.search_vectors(&[1.0, 2.0, 3.5], 2, &filter).unwrap();
///
/// let ids: Vec<_> = into_records(hits).into_iter().map(|r| r.id).collect();
/// assert_eq!(ids, vec!["vec1", "vec3"]);
/// ```
#[derive(Debug)]
pub struct Store {
    config: StoreConfig,
    router: PartitionRouter,
    partitions: Vec<Partition>,
}

impl Store {
    /// Creates a store from a config.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoPartitionAvailable`] if the partition count is zero.
    pub fn new(config: StoreConfig) -> Result<Self> {
        config.check()?;
        let router = PartitionRouter::with_seed(config.partition_count, config.routing_seed)?;
        let partitions = (0..config.partition_count)
            .map(|_| Partition::new())
            .collect();

        debug!(partitions = config.partition_count, "created store");
        Ok(Self {
            config,
            router,
            partitions,
        })
    }

    /// Creates a store with `partition_count` partitions and default settings.
    pub fn with_partitions(partition_count: usize) -> Result<Self> {
        Self::new(StoreConfig::new(partition_count))
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    #[inline]
    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }

    /// Returns the partitions in routing order.
    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    /// Returns the index of the partition that owns `id`.
    #[inline]
    pub fn route(&self, id: &str) -> usize {
        self.router.route(id)
    }

    fn partition_for(&self, id: &str) -> Result<&Partition> {
        self.partitions
            .get(self.router.route(id))
            .ok_or(Error::NoPartitionAvailable)
    }

    fn check_record(&self, record: &VectorRecord) -> Result<()> {
        if self.config.validate_on_insert {
            record.validate()?;
        }
        if let Some(expected) = self.config.dimension {
            if record.dimension() != expected {
                return Err(Error::LengthMismatch {
                    expected,
                    got: record.dimension(),
                });
            }
        }
        Ok(())
    }

    /// Adds a new record.
    ///
    /// # Errors
    ///
    /// - [`Error::AlreadyExists`] if the id is already stored.
    /// - [`Error::EmptyVector`] / [`Error::NonFiniteValue`] if validation is on
    ///   and the data is invalid.
    /// - [`Error::LengthMismatch`] if a dimension is configured and differs.
    pub fn add_vector(&self, record: VectorRecord) -> Result<()> {
        self.check_record(&record)?;
        trace!(id = %record.id, "add vector");
        self.partition_for(&record.id)?.insert(record)
    }

    /// Adds many records, returning how many were inserted.
    ///
    /// Every record is checked before anything is inserted, so an invalid
    /// record rejects the whole batch. Insertion then proceeds in order and
    /// stops at the first duplicate id; records before it stay inserted.
    pub fn add_vectors<I>(&self, records: I) -> Result<usize>
    where
        I: IntoIterator<Item = VectorRecord>,
    {
        let records: Vec<VectorRecord> = records.into_iter().collect();
        for record in &records {
            self.check_record(record)?;
        }

        let total = records.len();
        for (inserted, record) in records.into_iter().enumerate() {
            if let Err(err) = self.partition_for(&record.id)?.insert(record) {
                debug!(inserted, total, error = %err, "bulk insert stopped");
                return Err(err);
            }
        }
        debug!(total, "bulk insert complete");
        Ok(total)
    }

    /// Replaces an existing record wholesale.
    pub fn update_vector(&self, record: VectorRecord) -> Result<()> {
        self.check_record(&record)?;
        trace!(id = %record.id, "update vector");
        self.partition_for(&record.id)?.update(record)
    }

    /// Inserts or replaces a record. Returns the replaced record, if any.
    pub fn upsert_vector(&self, record: VectorRecord) -> Result<Option<VectorRecord>> {
        self.check_record(&record)?;
        trace!(id = %record.id, "upsert vector");
        Ok(self.partition_for(&record.id)?.upsert(record))
    }

    /// Returns a copy of the record with the given id.
    pub fn get_vector(&self, id: &str) -> Result<VectorRecord> {
        self.partition_for(id)?.get(id)
    }

    /// Removes the record with the given id, returning it.
    pub fn delete_vector(&self, id: &str) -> Result<VectorRecord> {
        trace!(id, "delete vector");
        self.partition_for(id)?.delete(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.partition_for(id)
            .map(|p| p.contains(id))
            .unwrap_or(false)
    }

    /// Returns the total number of records across partitions.
    pub fn len(&self) -> usize {
        self.partitions.iter().map(Partition::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.iter().all(Partition::is_empty)
    }

    /// Returns the record count of each partition, in routing order.
    pub fn partition_sizes(&self) -> Vec<usize> {
        self.partitions.iter().map(Partition::len).collect()
    }

    /// Returns every stored id, in no particular order.
    pub fn ids(&self) -> Vec<VectorId> {
        self.partitions.iter().flat_map(Partition::ids).collect()
    }

    /// Removes every record from every partition.
    pub fn clear(&self) {
        for partition in &self.partitions {
            partition.clear();
        }
    }

    /// Finds the `top_n` records most similar to `query` that pass `filter`.
    ///
    /// Each partition is scanned on its own thread and returns its local
    /// top-N; the union is re-ranked and truncated. Results are ordered by
    /// descending similarity, ties broken by ascending id.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if `top_n == 0` or the query is empty
    ///   or non-finite.
    /// - Any error raised by a partition scan (e.g. [`Error::LengthMismatch`]
    ///   or [`Error::ZeroVector`]); results from other partitions are discarded.
    pub fn search_vectors(
        &self,
        query: &[f64],
        top_n: usize,
        filter: &MetadataFilter,
    ) -> Result<Vec<SearchHit>> {
        search::validate_request(query, top_n)?;
        if let Some(expected) = self.config.dimension {
            if query.len() != expected {
                return Err(Error::LengthMismatch {
                    expected,
                    got: query.len(),
                });
            }
        }

        debug!(
            partitions = self.partitions.len(),
            top_n,
            filters = filter.len(),
            "fanning out search"
        );
        let outcomes = search::fan_out(&self.partitions, |partition| {
            partition.local_search(query, top_n, filter)
        });
        search::merge(outcomes, top_n)
    }
}

// Async API when tokio feature is enabled
#[cfg(feature = "async")]
mod async_api {
    use super::*;
    use std::sync::Arc;

    use tokio::task::JoinSet;

    fn join_failed(e: tokio::task::JoinError) -> Error {
        Error::TaskFailed(format!("spawn_blocking failed: {}", e))
    }

    /// Async wrapper for [`Store`].
    ///
    /// Point operations run on the blocking pool via `spawn_blocking`.
    /// Searches spawn one blocking task per partition into a `JoinSet` and
    /// honour [`StoreConfig::search_timeout`].
    ///
    /// # Example
    ///
    /// ```ignore
    /// use savitar_core::{AsyncStore, MetadataFilter, StoreConfig, VectorRecord};
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     let store = AsyncStore::new(StoreConfig::new(4)).unwrap();
    ///     store.add_vector(VectorRecord::new("vec1", vec![1.0, 2.0])).await.unwrap();
    ///     let hits = store.search_vectors(&[1.0, 2.0], 10, MetadataFilter::new()).await.unwrap();
    /// }
    /// ```
    #[derive(Debug, Clone)]
    pub struct AsyncStore {
        inner: Arc<Store>,
    }

    impl AsyncStore {
        /// Creates a new async store.
        pub fn new(config: StoreConfig) -> Result<Self> {
            Ok(Self::from_sync(Store::new(config)?))
        }

        /// Wraps an existing Store.
        pub fn from_sync(store: Store) -> Self {
            Self {
                inner: Arc::new(store),
            }
        }

        /// Adds a record asynchronously.
        pub async fn add_vector(&self, record: VectorRecord) -> Result<()> {
            let inner = Arc::clone(&self.inner);
            tokio::task::spawn_blocking(move || inner.add_vector(record))
                .await
                .map_err(join_failed)?
        }

        /// Adds many records asynchronously.
        pub async fn add_vectors(&self, records: Vec<VectorRecord>) -> Result<usize> {
            let inner = Arc::clone(&self.inner);
            tokio::task::spawn_blocking(move || inner.add_vectors(records))
                .await
                .map_err(join_failed)?
        }

        /// Updates a record asynchronously.
        pub async fn update_vector(&self, record: VectorRecord) -> Result<()> {
            let inner = Arc::clone(&self.inner);
            tokio::task::spawn_blocking(move || inner.update_vector(record))
                .await
                .map_err(join_failed)?
        }

        /// Gets a record asynchronously.
        pub async fn get_vector(&self, id: &str) -> Result<VectorRecord> {
            let inner = Arc::clone(&self.inner);
            let id = id.to_string();
            tokio::task::spawn_blocking(move || inner.get_vector(&id))
                .await
                .map_err(join_failed)?
        }

        /// Deletes a record asynchronously.
        pub async fn delete_vector(&self, id: &str) -> Result<VectorRecord> {
            let inner = Arc::clone(&self.inner);
            let id = id.to_string();
            tokio::task::spawn_blocking(move || inner.delete_vector(&id))
                .await
                .map_err(join_failed)?
        }

        /// Searches every partition concurrently.
        ///
        /// Returns the first error reported by any partition task; the
        /// remaining tasks are aborted and no partial results are returned.
        pub async fn search_vectors(
            &self,
            query: &[f64],
            top_n: usize,
            filter: MetadataFilter,
        ) -> Result<Vec<SearchHit>> {
            search::validate_request(query, top_n)?;
            if let Some(expected) = self.inner.config.dimension {
                if query.len() != expected {
                    return Err(Error::LengthMismatch {
                        expected,
                        got: query.len(),
                    });
                }
            }

            let query: Arc<[f64]> = Arc::from(query);
            let filter = Arc::new(filter);
            let mut tasks = JoinSet::new();
            for index in 0..self.inner.partition_count() {
                let inner = Arc::clone(&self.inner);
                let query = Arc::clone(&query);
                let filter = Arc::clone(&filter);
                tasks.spawn_blocking(move || {
                    inner.partitions[index].local_search(&query, top_n, &filter)
                });
            }
            debug!(tasks = tasks.len(), top_n, "fanning out async search");

            let gather = async {
                let mut outcomes: Vec<Vec<SearchHit>> = Vec::with_capacity(tasks.len());
                while let Some(joined) = tasks.join_next().await {
                    match joined.map_err(join_failed)? {
                        Ok(hits) => outcomes.push(hits),
                        Err(err) => {
                            tasks.abort_all();
                            return Err(err);
                        }
                    }
                }
                Ok::<_, Error>(outcomes)
            };

            let outcomes = match self.inner.config.search_timeout() {
                Some(limit) => tokio::time::timeout(limit, gather)
                    .await
                    .map_err(|_| Error::Timeout(limit))??,
                None => gather.await?,
            };
            search::merge(outcomes.into_iter().map(Ok), top_n)
        }

        /// Returns the number of records.
        pub fn len(&self) -> usize {
            self.inner.len()
        }

        /// Returns true if empty.
        pub fn is_empty(&self) -> bool {
            self.inner.is_empty()
        }

        pub fn partition_count(&self) -> usize {
            self.inner.partition_count()
        }

        /// Returns reference to inner sync store.
        pub fn inner(&self) -> &Store {
            &self.inner
        }
    }
}

#[cfg(feature = "async")]
pub use async_api::AsyncStore;
