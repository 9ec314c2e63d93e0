#![deny(clippy::all)]
#![forbid(unsafe_code)]

//! Request-scoped translations with catalogs that build themselves.
//!
//! A [Translator] resolves source strings to their translation in some locale and falls back to the
//! source string if there is none. In development mode, every unknown source string is registered
//! in the catalog files of all locales, so running the application creates the skeleton that
//! translators fill in later. The [binding] module installs a per-request [I18n] context into an
//! axum router.

pub mod binding;
pub mod config;
pub mod error;
pub mod format;
pub mod translator;

pub use binding::{I18n, I18nRouterExt, Locals};
pub use error::*;
pub use translator::Translator;

// reexport the catalog crate
pub use tolk_catalog as catalog;
