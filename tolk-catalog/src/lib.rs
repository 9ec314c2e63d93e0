//! This crate contains the translation catalogs, the in-memory store of all catalogs and the
//! backends that persist catalogs per locale.

pub mod backend;
pub mod catalog;
pub mod error;
pub mod store;

// reexport errors types
pub use error::*;

// reexport catalog types and backends
pub use backend::json::{JsonFileBackend, StagedCatalog};
pub use catalog::Catalog;
pub use store::CatalogStore;
