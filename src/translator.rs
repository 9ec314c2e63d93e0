use crate::config::Config;
use crate::error::Result;
use crate::format::format;
use serde_json::Value;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tolk_catalog::backend::CatalogBackend;
use tolk_catalog::{Catalog, CatalogStore, JsonFileBackend};
use tracing::{debug, info, trace, warn};

/// [Translator] resolves source strings to their translation in some locale.
///
/// It owns the catalogs of all known locales. Lookups fall back to the source string if there is
/// no translation. In development mode, unknown source strings are additionally registered in the
/// catalogs and persisted through the backend, so that running the application builds up the
/// catalog files that translators fill in later.
#[derive(Debug)]
pub struct Translator<B = JsonFileBackend> {
    config: Config,
    backend: B,
    store: RwLock<CatalogStore>,
}

impl Translator<JsonFileBackend> {
    /// Creates a translator that reads and writes the catalog files in the configured directory.
    pub fn from_config(config: Config) -> Self {
        let backend = JsonFileBackend::new(&config.path);
        Self::new(config, backend)
    }

    /// Creates a translator from the layered configuration (see [Config::new]).
    pub fn from_env() -> Result<Self> {
        Ok(Self::from_config(Config::new()?))
    }
}

impl<B> Translator<B>
where
    B: CatalogBackend,
{
    /// Creates a translator and loads the catalogs of all configured locales.
    ///
    /// Catalogs that cannot be loaded start out empty.
    pub fn new(config: Config, backend: B) -> Self {
        let translator = Self {
            config,
            backend,
            store: RwLock::new(CatalogStore::new()),
        };

        for locale in &translator.config.locales {
            translator.reload(locale);
        }
        debug!(
            locales = ?translator.config.locales,
            dev_mode = translator.config.dev_mode,
            "initialized translator"
        );

        translator
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn locales(&self) -> &[String] {
        &self.config.locales
    }

    pub fn default_locale(&self) -> &str {
        &self.config.default_locale
    }

    pub fn is_dev_mode(&self) -> bool {
        self.config.dev_mode
    }

    /// Returns a snapshot of the current catalog of a locale.
    pub fn catalog(&self, locale: &str) -> Option<Catalog> {
        self.read_store().get(locale).cloned()
    }

    /// Replaces the catalog of a locale with its persisted version.
    ///
    /// If the catalog cannot be loaded (e.g. the file is missing or invalid), the locale is reset to
    /// an empty catalog. This never fails.
    #[tracing::instrument(skip(self))]
    pub fn reload(&self, locale: &str) {
        let catalog = match self.backend.load(locale) {
            Ok(catalog) => catalog,
            Err(err) if err.is_not_found() => {
                debug!("no catalog persisted, starting empty");
                Catalog::new()
            }
            Err(err) => {
                warn!(error = %err, "failed to load catalog, starting empty");
                Catalog::new()
            }
        };
        self.write_store().insert(locale, catalog);
    }

    /// Reloads the catalogs of all configured locales.
    pub fn reload_all(&self) {
        for locale in &self.config.locales {
            self.reload(locale);
        }
        debug!(catalogs = self.read_store().len(), "reloaded catalogs");
    }

    /// Translates the source string with the default locale.
    pub fn translate_default(&self, source: &str, args: &[Value]) -> Result<String> {
        self.translate(&self.config.default_locale, source, args)
    }

    /// Translates the source string to the locale and substitutes the arguments.
    ///
    /// Falls back to the source string if there is no translation. In development mode, missing keys
    /// are registered (see [Config::update_as_null] and [Config::update_all_locales]) and the changed
    /// catalogs are persisted.
    ///
    /// # Errors
    ///
    /// Will return an error if a changed catalog cannot be persisted. Lookups alone never fail.
    #[tracing::instrument(skip(self, args))]
    pub fn translate(&self, locale: &str, source: &str, args: &[Value]) -> Result<String> {
        {
            let store = self.read_store();
            match store.get(locale).map(|catalog| catalog.get(source)) {
                Some(Some(translation)) => {
                    trace!(translated = translation.is_some(), "found key");
                    return Ok(format(translation.unwrap_or(source), args));
                }
                Some(None) | None if !self.config.dev_mode => {
                    trace!("no translation, falling back to source");
                    return Ok(format(source, args));
                }
                _ => {}
            }
        }

        let mut store = self.write_store();
        let translation = self.register(&mut store, locale, source)?;
        Ok(format(translation.as_deref().unwrap_or(source), args))
    }

    /// Registers a missing key (development mode only) and returns the translation to use.
    fn register(
        &self,
        store: &mut CatalogStore,
        locale: &str,
        source: &str,
    ) -> Result<Option<String>> {
        // the key may have been registered while waiting for the lock
        if let Some(translation) = store.get_or_create(locale).get(source) {
            return Ok(translation.map(str::to_owned));
        }

        let value = if self.config.update_as_null {
            None
        } else {
            Some(source.to_owned())
        };
        info!(value = ?value, "registering new key");

        if self.config.update_all_locales {
            for target in &self.config.locales {
                let catalog = store.get_or_create(target);
                if catalog.register(source, value.clone()) {
                    self.backend.save(target, catalog)?;
                }
            }
        } else {
            let catalog = store.get_or_create(locale);
            catalog.register(source, value);
            self.backend.save(locale, catalog)?;
        }

        Ok(None)
    }

    fn read_store(&self) -> RwLockReadGuard<'_, CatalogStore> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_store(&self) -> RwLockWriteGuard<'_, CatalogStore> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }
}
