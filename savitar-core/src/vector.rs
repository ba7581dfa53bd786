//! Vector records stored by Savitar.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::metadata::Metadata;

/// Unique identifier for a vector record.
pub type VectorId = String;

/// A vector with an id, its feature data and string metadata.
///
/// Records are replaced wholesale on update; there is no partial mutation
/// through the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    pub id: VectorId,
    pub data: Vec<f64>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl VectorRecord {
    /// Creates a record with empty metadata.
    ///
    /// # Example
    ///
    /// ```
    /// use savitar_core::VectorRecord;
    ///
    /// let v = VectorRecord::new("vec1", vec![1.0, 2.0, 3.0]);
    /// assert_eq!(v.dimension(), 3);
    /// assert!(v.validate().is_ok());
    /// ```
    pub fn new<I: Into<VectorId>>(id: I, data: Vec<f64>) -> Self {
        Self {
            id: id.into(),
            data,
            metadata: Metadata::new(),
        }
    }

    /// Replaces the metadata. Chainable.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Adds one metadata field. Chainable.
    pub fn with_field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.metadata.set(key, value);
        self
    }

    /// Returns the dimension (length) of the data.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.data.len()
    }

    /// Checks that the data is non-empty and contains only finite values.
    pub fn validate(&self) -> Result<()> {
        validate_data(&self.data)
    }
}

/// Checks that `data` is non-empty and every element is finite.
pub fn validate_data(data: &[f64]) -> Result<()> {
    if data.is_empty() {
        return Err(Error::EmptyVector);
    }
    match data.iter().position(|x| !x.is_finite()) {
        Some(index) => Err(Error::NonFiniteValue { index }),
        None => Ok(()),
    }
}
