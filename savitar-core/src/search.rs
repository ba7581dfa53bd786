//! Fan-out and merge for distributed top-N search.
//!
//! A search dispatches the same query to every target (partition or node)
//! on its own scoped thread, waits for all of them, and then merges the
//! local top-N lists into one global ranking. Because a record's score does
//! not depend on which target holds it, the global top-N is always a subset
//! of the union of the local top-N lists.
//!
//! Failure is all-or-nothing: if any target fails, the whole search fails
//! with that error and no partial results are returned.

use std::thread;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::partition::{rank, SearchHit};
use crate::vector::VectorRecord;

/// Rejects malformed search requests before any work is dispatched.
pub(crate) fn validate_request(query: &[f64], top_n: usize) -> Result<()> {
    if top_n == 0 {
        return Err(Error::InvalidArgument(
            "top_n must be greater than zero".to_string(),
        ));
    }
    if query.is_empty() {
        return Err(Error::InvalidArgument(
            "query vector cannot be empty".to_string(),
        ));
    }
    if let Some(index) = query.iter().position(|x| !x.is_finite()) {
        return Err(Error::InvalidArgument(format!(
            "query contains a non-finite value at index {index}"
        )));
    }
    Ok(())
}

/// Runs `scan` against every target concurrently, one thread per target,
/// and returns the outcomes in target order once all have finished.
pub(crate) fn fan_out<T, F>(targets: &[T], scan: F) -> Vec<Result<Vec<SearchHit>>>
where
    T: Sync,
    F: Fn(&T) -> Result<Vec<SearchHit>> + Sync,
{
    let scan = &scan;
    thread::scope(|scope| {
        let handles: Vec<_> = targets
            .iter()
            .map(|target| scope.spawn(move || scan(target)))
            .collect();

        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|_| Err(Error::TaskFailed("scan thread panicked".to_string())))
            })
            .collect()
    })
}

/// Merges per-target results into one ranking of at most `top_n` hits.
///
/// The first failed outcome (in target order) is returned unchanged and
/// every successful outcome is discarded.
pub(crate) fn merge<I>(outcomes: I, top_n: usize) -> Result<Vec<SearchHit>>
where
    I: IntoIterator<Item = Result<Vec<SearchHit>>>,
{
    let mut merged = Vec::new();
    for (index, outcome) in outcomes.into_iter().enumerate() {
        match outcome {
            Ok(hits) => merged.extend(hits),
            Err(err) => {
                warn!(index, error = %err, "scan failed, dropping results");
                return Err(err);
            }
        }
    }

    let candidates = merged.len();
    rank(&mut merged, top_n);
    debug!(candidates, returned = merged.len(), "merged search results");
    Ok(merged)
}

/// Strips scores from a ranked hit list, keeping the order.
///
/// # Example
///
/// ```
/// use savitar_core::{into_records, MetadataFilter, Store, VectorRecord};
///
/// let store = Store::with_partitions(2).unwrap();
/// store.add_vector(VectorRecord::new("a", vec![1.0, 0.0])).unwrap();
///
/// let hits = store.search_vectors(&[1.0, 0.0], 1, &MetadataFilter::new()).unwrap();
/// let records = into_records(hits);
/// assert_eq!(records[0].id, "a");
/// ```
pub fn into_records(hits: Vec<SearchHit>) -> Vec<VectorRecord> {
    hits.into_iter().map(|hit| hit.record).collect()
}
