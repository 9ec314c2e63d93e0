//! The backends read and write catalogs of single locales from and to some persistent medium.

pub mod json;

use crate::{Catalog, error::Result};
use std::fmt::Debug;

/// A [CatalogBackend] persists catalogs per locale.
///
/// All operations are blocking. They are only invoked at startup, on explicit reloads and when
/// development mode registers new keys.
pub trait CatalogBackend: Debug + Send + Sync {
    /// Reads the persisted catalog of a locale.
    fn load(&self, locale: &str) -> Result<Catalog>;

    /// Replaces the persisted catalog of a locale. Implementations must never leave a partially
    /// written catalog behind.
    fn save(&self, locale: &str, catalog: &Catalog) -> Result<()>;
}
