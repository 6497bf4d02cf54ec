//! Informational metadata attached to a mesh.
//!
//! Metadata records provenance (fixture parameters, the repair log, ...).
//! It is never consulted for control flow.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Metadata key under which the repair orchestrator stores its log.
pub const REPAIR_LOG_KEY: &str = "repair_log";

/// A single metadata value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum MetadataValue {
    /// Boolean flag.
    Flag(bool),
    /// Floating point number.
    Number(f64),
    /// Free-form text.
    Text(String),
    /// Ordered list of lines (used for logs).
    Lines(Vec<String>),
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for MetadataValue {
    fn from(value: Vec<String>) -> Self {
        Self::Lines(value)
    }
}

/// String-keyed metadata map with deterministic iteration order.
///
/// # Example
///
/// ```
/// use neuromesh_types::Metadata;
///
/// let mut meta = Metadata::new();
/// meta.insert("morphology_type", "cylinder");
/// meta.insert("radius", 5.0);
///
/// assert_eq!(meta.text("morphology_type"), Some("cylinder"));
/// assert_eq!(meta.number("radius"), Some(5.0));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Metadata {
    entries: BTreeMap<String, MetadataValue>,
}

impl Metadata {
    /// Create an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Insert or replace a value, returning the previous one.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<MetadataValue>,
    ) -> Option<MetadataValue> {
        self.entries.insert(key.into(), value.into())
    }

    /// Look up a raw value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        self.entries.get(key)
    }

    /// Remove a value.
    pub fn remove(&mut self, key: &str) -> Option<MetadataValue> {
        self.entries.remove(key)
    }

    /// Look up a text value.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.entries.get(key) {
            Some(MetadataValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// Look up a numeric value.
    #[must_use]
    pub fn number(&self, key: &str) -> Option<f64> {
        match self.entries.get(key) {
            Some(MetadataValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    /// Look up a list of lines.
    #[must_use]
    pub fn lines(&self, key: &str) -> Option<&[String]> {
        match self.entries.get(key) {
            Some(MetadataValue::Lines(lines)) => Some(lines),
            _ => None,
        }
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetadataValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_lookups_reject_other_kinds() {
        let mut meta = Metadata::new();
        meta.insert("axis", "z");
        assert_eq!(meta.number("axis"), None);
        assert_eq!(meta.lines("axis"), None);
        assert_eq!(meta.text("missing"), None);
    }

    #[test]
    fn insert_replaces() {
        let mut meta = Metadata::new();
        assert!(meta.insert(REPAIR_LOG_KEY, vec!["a".to_string()]).is_none());
        let previous = meta.insert(REPAIR_LOG_KEY, vec!["b".to_string()]);
        assert_eq!(previous, Some(MetadataValue::Lines(vec!["a".to_string()])));
        assert_eq!(meta.lines(REPAIR_LOG_KEY), Some(&["b".to_string()][..]));
        assert_eq!(meta.len(), 1);
    }

    #[test]
    fn iteration_is_sorted() {
        let mut meta = Metadata::new();
        meta.insert("b", 2.0);
        meta.insert("a", true);
        let keys: Vec<_> = meta.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["a", "b"]);
    }
}
