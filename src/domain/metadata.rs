//! Namespaced key-value metadata record
//!
//! The record maps a namespace string to an ordered attribute map. Both levels
//! keep insertion order, which is also the order annotations get created in.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Default prefix of every imported namespace
pub const DEFAULT_NAMESPACE_PREFIX: &str = "ARC:ISA";

/// Builds the namespace key for a sheet and a section header
///
/// Both segments are trimmed and upper-cased.
///
/// # Examples
///
/// ```
/// use isalink::domain::metadata::namespace_key;
///
/// assert_eq!(
///     namespace_key("ARC:ISA", "Investigation", "GENERAL"),
///     "ARC:ISA:INVESTIGATION:GENERAL"
/// );
/// ```
pub fn namespace_key(prefix: &str, sheet_name: &str, header: &str) -> String {
    format!(
        "{}:{}:{}",
        prefix,
        sheet_name.trim().to_uppercase(),
        header.trim().to_uppercase()
    )
}

/// Ordered attribute map of one namespace
pub type Attributes = IndexMap<String, String>;

/// Two-level mapping: namespace → attribute key → value
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataRecord {
    namespaces: IndexMap<String, Attributes>,
}

impl MetadataRecord {
    /// Creates an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensures a namespace entry exists and returns it
    pub fn namespace_mut(&mut self, namespace: &str) -> &mut Attributes {
        self.namespaces.entry(namespace.to_string()).or_default()
    }

    /// Sets an attribute, replacing any earlier value under the same key
    ///
    /// A replaced key keeps its original position.
    pub fn set(&mut self, namespace: &str, key: impl Into<String>, value: impl Into<String>) {
        self.namespace_mut(namespace).insert(key.into(), value.into());
    }

    /// Returns the attributes of a namespace
    pub fn get(&self, namespace: &str) -> Option<&Attributes> {
        self.namespaces.get(namespace)
    }

    /// Iterates namespaces in creation order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Attributes)> {
        self.namespaces.iter()
    }

    /// Namespace keys in creation order
    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.namespaces.keys().map(String::as_str)
    }

    /// Number of namespaces
    pub fn len(&self) -> usize {
        self.namespaces.len()
    }

    /// Total number of attributes across all namespaces
    pub fn attribute_count(&self) -> usize {
        self.namespaces.values().map(IndexMap::len).sum()
    }

    /// True when no namespace exists
    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }
}

impl<'a> IntoIterator for &'a MetadataRecord {
    type Item = (&'a String, &'a Attributes);
    type IntoIter = indexmap::map::Iter<'a, String, Attributes>;

    fn into_iter(self) -> Self::IntoIter {
        self.namespaces.iter()
    }
}
