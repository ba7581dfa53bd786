//! Exact-match metadata filters.
//!
//! A filter is a conjunction of `key == value` conditions. A record passes
//! only if its metadata holds every filter key with exactly the filter's
//! value; a record missing a required key is excluded. The empty filter
//! matches everything.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::metadata::Metadata;

/// A set of required metadata key/value pairs.
///
/// # Example
///
/// ```
/// use savitar_core::{Metadata, MetadataFilter};
///
/// let filter = MetadataFilter::new().eq("category", "image");
///
/// assert!(filter.matches(&Metadata::new().with_field("category", "image")));
/// assert!(!filter.matches(&Metadata::new().with_field("category", "text")));
/// assert!(!filter.matches(&Metadata::new()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataFilter {
    required: HashMap<String, String>,
}

impl MetadataFilter {
    /// Creates an empty filter that matches every record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires `key` to equal `value`. Chainable; a repeated key overrides.
    pub fn eq<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.required.insert(key.into(), value.into());
        self
    }

    /// Returns true if `metadata` satisfies every condition.
    pub fn matches(&self, metadata: &Metadata) -> bool {
        self.required
            .iter()
            .all(|(key, value)| metadata.get(key) == Some(value.as_str()))
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.required.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.required.len()
    }

    /// Returns an iterator over the required pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.required.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for MetadataFilter
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            required: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<HashMap<String, String>> for MetadataFilter {
    fn from(required: HashMap<String, String>) -> Self {
        Self { required }
    }
}
