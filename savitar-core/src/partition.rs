//! A single partition (shard) of the vector collection.
//!
//! Each partition owns its records behind its own reader/writer lock.
//! Locks are never shared between partitions, so a write to one partition
//! never waits on a scan of another.
//!
//! Search is a brute-force linear scan:
//! - exact results, every matching record is scored
//! - concurrent with other reads of the same partition
//! - mutually exclusive with writes to this partition only

use std::cmp::Ordering;
use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::{Error, Result};
use crate::filter::MetadataFilter;
use crate::similarity::cosine_similarity;
use crate::vector::{VectorId, VectorRecord};

/// A scored search result.
///
/// Hits order best-first: higher similarity sorts earlier, and equal scores
/// fall back to ascending id so rankings are deterministic.
#[derive(Debug, Clone)]
pub struct SearchHit {
    /// The matched record.
    pub record: VectorRecord,
    /// Cosine similarity to the query, in [-1, 1].
    pub similarity: f64,
}

impl SearchHit {
    pub fn new(record: VectorRecord, similarity: f64) -> Self {
        Self { record, similarity }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.record.id
    }
}

impl PartialEq for SearchHit {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SearchHit {}

impl PartialOrd for SearchHit {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SearchHit {
    fn cmp(&self, other: &Self) -> Ordering {
        ranking(
            (self.similarity, self.record.id.as_str()),
            (other.similarity, other.record.id.as_str()),
        )
    }
}

/// Best-first order on (similarity, id) pairs.
#[inline]
fn ranking(a: (f64, &str), b: (f64, &str)) -> Ordering {
    // Higher similarity = better, so compare in reverse
    b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1))
}

/// Best-first order for records scored in place inside a partition.
fn by_rank(a: &(f64, &VectorRecord), b: &(f64, &VectorRecord)) -> Ordering {
    ranking((a.0, a.1.id.as_str()), (b.0, b.1.id.as_str()))
}

/// Sorts hits best-first and keeps at most `top_n`.
pub(crate) fn rank(hits: &mut Vec<SearchHit>, top_n: usize) {
    hits.sort_unstable();
    hits.truncate(top_n);
}

/// An independently locked map from id to record.
///
/// # Example
///
/// ```
/// use savitar_core::{MetadataFilter, Partition, VectorRecord};
///
/// let partition = Partition::new();
/// partition.insert(VectorRecord::new("a", vec![1.0, 0.0]).with_field("kind", "x")).unwrap();
/// partition.insert(VectorRecord::new("b", vec![0.0, 1.0]).with_field("kind", "y")).unwrap();
///
/// let hits = partition.local_search(&[1.0, 0.1], 10, &MetadataFilter::new()).unwrap();
/// assert_eq!(hits[0].id(), "a");
///
/// let hits = partition
///     .local_search(&[1.0, 0.1], 10, &MetadataFilter::new().eq("kind", "y"))
///     .unwrap();
/// assert_eq!(hits.len(), 1);
/// assert_eq!(hits[0].id(), "b");
/// ```
#[derive(Debug, Default)]
pub struct Partition {
    vectors: RwLock<HashMap<VectorId, VectorRecord>>,
}

impl Partition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of records in the partition.
    pub fn len(&self) -> usize {
        self.vectors.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.read().is_empty()
    }

    /// Stores a new record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyExists`] if the id is already present.
    pub fn insert(&self, record: VectorRecord) -> Result<()> {
        let mut vectors = self.vectors.write();
        if vectors.contains_key(&record.id) {
            return Err(Error::AlreadyExists(record.id));
        }
        vectors.insert(record.id.clone(), record);
        Ok(())
    }

    /// Replaces an existing record wholesale.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the id is absent.
    pub fn update(&self, record: VectorRecord) -> Result<()> {
        let mut vectors = self.vectors.write();
        match vectors.get_mut(&record.id) {
            Some(slot) => {
                *slot = record;
                Ok(())
            }
            None => Err(Error::NotFound(record.id)),
        }
    }

    /// Inserts or replaces a record. Returns the replaced record, if any.
    pub fn upsert(&self, record: VectorRecord) -> Option<VectorRecord> {
        self.vectors.write().insert(record.id.clone(), record)
    }

    /// Returns a copy of the record with the given id.
    pub fn get(&self, id: &str) -> Result<VectorRecord> {
        self.vectors
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    /// Removes a record, returning it.
    pub fn delete(&self, id: &str) -> Result<VectorRecord> {
        self.vectors
            .write()
            .remove(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.vectors.read().contains_key(id)
    }

    /// Returns the ids currently stored, in no particular order.
    pub fn ids(&self) -> Vec<VectorId> {
        self.vectors.read().keys().cloned().collect()
    }

    /// Removes every record.
    pub fn clear(&self) {
        self.vectors.write().clear();
    }

    /// Scores every record that passes `filter` and returns the best `top_n`.
    ///
    /// Holds the read lock for the whole scan. The first similarity error
    /// (e.g. a record whose length differs from the query) aborts the scan.
    pub fn local_search(
        &self,
        query: &[f64],
        top_n: usize,
        filter: &MetadataFilter,
    ) -> Result<Vec<SearchHit>> {
        let vectors = self.vectors.read();

        let mut scored = vectors
            .values()
            .filter(|record| filter.matches(&record.metadata))
            .map(|record| Ok((cosine_similarity(query, &record.data)?, record)))
            .collect::<Result<Vec<(f64, &VectorRecord)>>>()?;

        scored.sort_unstable_by(by_rank);
        scored.truncate(top_n);

        // Only the survivors are copied out of the partition.
        Ok(scored
            .into_iter()
            .map(|(similarity, record)| SearchHit::new(record.clone(), similarity))
            .collect())
    }
}
