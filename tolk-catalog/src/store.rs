use crate::Catalog;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// [CatalogStore] holds the catalogs of all locales that are known at runtime.
///
/// The store itself performs no I/O. Loading and saving is done by a
/// [CatalogBackend](crate::backend::CatalogBackend) on behalf of the owner of the store.
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    catalogs: HashMap<String, Catalog>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, locale: &str) -> Option<&Catalog> {
        self.catalogs.get(locale)
    }

    pub fn contains(&self, locale: &str) -> bool {
        self.catalogs.contains_key(locale)
    }

    /// Replaces the catalog of a locale, returning the previous one.
    pub fn insert(&mut self, locale: impl Into<String>, catalog: Catalog) -> Option<Catalog> {
        self.catalogs.insert(locale.into(), catalog)
    }

    /// Returns the catalog of a locale, creating an empty one if the locale is unknown.
    pub fn get_or_create(&mut self, locale: &str) -> &mut Catalog {
        match self.catalogs.entry(locale.to_owned()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(Catalog::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.catalogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalogs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_create_keeps_existing() {
        let mut store = CatalogStore::new();
        let mut catalog = Catalog::new();
        catalog.insert("Hello", Some("Hallo".to_string()));
        store.insert("de", catalog);

        assert_eq!(store.get_or_create("de").get("Hello"), Some(Some("Hallo")));
        assert!(store.get_or_create("bg").is_empty());
        assert!(store.contains("bg"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_insert_replaces() {
        let mut store = CatalogStore::new();
        store.get_or_create("en").insert("Hello", None);

        let previous = store.insert("en", Catalog::new());
        assert_eq!(previous.map(|c| c.len()), Some(1));
        assert_eq!(store.get("en").map(Catalog::len), Some(0));
    }
}
