use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A flat translation catalog of a single locale.
///
/// Each entry maps a source string to its translation. A value of [None] is the missing marker:
/// the key was registered (usually automatically in development mode) but nobody translated it
/// yet. This is different from a translation to the empty string.
///
/// Entries are kept sorted by key, so that written catalog files have a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: BTreeMap<String, Option<String>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry for a key. The outer [Option] tells whether the key is known at all,
    /// the inner one whether it is translated.
    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.entries.get(key).map(Option::as_deref)
    }

    /// Sets an entry, replacing any previous value of the key.
    pub fn insert(&mut self, key: impl Into<String>, value: Option<String>) {
        self.entries.insert(key.into(), value);
    }

    /// Sets an entry only if the key is absent. Returns whether the catalog was changed.
    ///
    /// Existing entries (translated or missing) are never touched.
    pub fn register(&mut self, key: &str, value: Option<String>) -> bool {
        if self.entries.contains_key(key) {
            return false;
        }
        self.entries.insert(key.to_owned(), value);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Option<String>)> for Catalog {
    fn from_iter<T: IntoIterator<Item = (K, Option<String>)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_marker_is_not_empty_translation() {
        let mut catalog = Catalog::new();
        catalog.insert("Hello", None);
        catalog.insert("Bye", Some(String::new()));

        assert_eq!(catalog.get("Hello"), Some(None));
        assert_eq!(catalog.get("Bye"), Some(Some("")));
        assert_eq!(catalog.get("Other"), None);
    }

    #[test]
    fn test_register_keeps_existing_entries() {
        let mut catalog = Catalog::new();
        catalog.insert("Hello", Some("Здравей".to_string()));

        assert!(!catalog.register("Hello", None));
        assert_eq!(catalog.get("Hello"), Some(Some("Здравей")));

        assert!(catalog.register("Bye", None));
        assert!(!catalog.register("Bye", Some("Bye".to_string())));
        assert_eq!(catalog.get("Bye"), Some(None));
    }

    #[test]
    fn test_deserialize_flat_object_with_nulls() {
        let catalog: Catalog =
            serde_json::from_str(r#"{"Hello": "Здравей", "Bye": null}"#).expect("valid catalog");

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("Hello"), Some(Some("Здравей")));
        assert_eq!(catalog.get("Bye"), Some(None));
    }

    #[test]
    fn test_reject_nested_values() {
        let result = serde_json::from_str::<Catalog>(r#"{"Hello": {"nested": "value"}}"#);
        assert!(result.is_err());

        let result = serde_json::from_str::<Catalog>(r#"["Hello"]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_pretty_sorted() {
        let catalog: Catalog = [("b", None), ("a", Some("A".to_string()))]
            .into_iter()
            .collect();

        let json = serde_json::to_string_pretty(&catalog).expect("serializable catalog");
        assert_eq!(json, "{\n  \"a\": \"A\",\n  \"b\": null\n}");
    }
}
