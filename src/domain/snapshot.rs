use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Full state of a feed file: entry-key to whatever record the feed stores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(Map<String, Value>);

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a snapshot from raw file contents. The document must be a JSON object.
    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, record: Value) -> Option<Value> {
        self.0.insert(key.into(), record)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Keys present in `current` but not in `previous`.
///
/// Removed keys and records that changed under an existing key are not
/// reported; only growth of the key set counts as new content.
pub fn diff(previous: &Snapshot, current: &Snapshot) -> BTreeSet<String> {
    current
        .keys()
        .filter(|key| !previous.contains_key(key))
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot(keys: &[&str]) -> Snapshot {
        keys.iter().map(|k| (*k, json!({}))).collect()
    }

    fn set(keys: &[&str]) -> BTreeSet<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_diff_reports_added_keys() {
        let previous = snapshot(&["a", "b"]);
        let current = snapshot(&["a", "b", "c"]);
        assert_eq!(diff(&previous, &current), set(&["c"]));
    }

    #[test]
    fn test_diff_against_itself_is_empty() {
        let s = snapshot(&["a", "b", "c"]);
        assert!(diff(&s, &s).is_empty());
    }

    #[test]
    fn test_diff_from_empty_is_every_key() {
        let current = snapshot(&["x", "y"]);
        assert_eq!(diff(&Snapshot::new(), &current), set(&["x", "y"]));
    }

    #[test]
    fn test_diff_ignores_deletions() {
        let previous = snapshot(&["a", "b"]);
        let current = snapshot(&["a", "c"]);
        assert_eq!(diff(&previous, &current), set(&["c"]));
        assert!(diff(&previous, &snapshot(&["a"])).is_empty());
    }

    #[test]
    fn test_diff_ignores_value_changes() {
        let previous: Snapshot = [("a", json!({"title": "old"}))].into_iter().collect();
        let current: Snapshot = [("a", json!({"title": "new"}))].into_iter().collect();
        assert!(diff(&previous, &current).is_empty());
    }

    #[test]
    fn test_from_slice_requires_object() {
        let s = Snapshot::from_slice(br#"{"k": {"type": "entry"}}"#).unwrap();
        assert_eq!(s.len(), 1);
        assert_eq!(s.get("k"), Some(&json!({"type": "entry"})));

        assert!(Snapshot::from_slice(b"[1, 2, 3]").is_err());
        assert!(Snapshot::from_slice(b"{not json").is_err());
    }
}
