//! String metadata attached to vector records.
//!
//! Metadata is a flat string-to-string map. Insertion order is irrelevant
//! and it may be empty. Filters match against it by exact string equality.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Metadata map attached to a [`VectorRecord`](crate::VectorRecord).
///
/// # Example
///
/// ```
/// use savitar_core::Metadata;
///
/// let meta = Metadata::new()
///     .with_field("category", "image")
///     .with_field("source", "camera");
///
/// assert_eq!(meta.get("category"), Some("image"));
/// assert_eq!(meta.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata {
    data: HashMap<String, String>,
}

impl Metadata {
    /// Creates a new empty metadata map.
    #[inline]
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    /// Creates metadata from an existing map.
    #[inline]
    pub fn from_map(data: HashMap<String, String>) -> Self {
        Self { data }
    }

    /// Adds a field. Chainable.
    pub fn with_field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Sets a field value, returning the previous one.
    pub fn set<K, V>(&mut self, key: K, value: V) -> Option<String>
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.data.insert(key.into(), value.into())
    }

    /// Gets a field value by key.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    /// Removes a field and returns its value if present.
    #[inline]
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.data.remove(key)
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns an iterator over the fields.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.data.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the underlying map.
    #[inline]
    pub fn into_inner(self) -> HashMap<String, String> {
        self.data
    }
}

impl<K, V> FromIterator<(K, V)> for Metadata
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            data: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<HashMap<String, String>> for Metadata {
    fn from(data: HashMap<String, String>) -> Self {
        Self::from_map(data)
    }
}
