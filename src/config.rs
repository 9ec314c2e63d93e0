//! The config module defines the translation configuration. It is based on [config], a layered
//! configuration system for Rust applications (with strong support for 12-factor applications).
//!
//! # Layers
//!
//! The configuration consists of multiple layers. Upper layers overwrite lower layer configurations
//! (e.g. environment variables overwrite the default configuration).
//!
//! ## Layer 1 (Environment variables) \[optional\]
//!
//! The environment variables are the top most layer. They can be used to overwrite any previous configuration.
//! Environment variables have the format `[ENV_PREFIX]__[field]` where `ENV_PREFIX` is an environment
//! variable defaulting to `TOLK`. That means, the field `default_locale` can be overwritten by the
//! environment variable `TOLK__DEFAULT_LOCALE`. The `locales` list is given comma separated
//! (e.g. `TOLK__LOCALES=en,bg`).
//!
//! ## Layer 2 (Custom configuration) \[optional\]
//!
//! The next layer is an optional configuration file intended to be used by deployments and local testing. The file
//! location can be configured using the `CONFIG_FILE` environment variable, defaulting to `config/config`.
//! It can be of any file type supported by [config] (e.g. `config/config.toml`).
//!
//! ## Layer 3 (Default configuration)
//!
//! The default configuration provides default value for all config fields. It is loaded from
//! `config/default.toml` at compile time. The only exception is `dev_mode`, which defaults to whether
//! the environment variable `APP_ENV` is set to `development`.
//!
//! # Usage
//!
//! The configuration can be created by using [Config::new]. This loads/overrides the
//! configuration fields layer-by-layer.
//!
//! ```rs
//! let config: Config = Config::new()?;
//! ```

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

/// The environment variable that marks a development environment.
pub const APP_ENV: &str = "APP_ENV";

const DEFAULT_CONFIG: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config/default.toml"));

/// [Config] holds all translation settings. I.g. one immutable instance is created on startup and
/// then handed to the [Translator](crate::translator::Translator).
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Whether missing keys are registered and written to the catalog files.
    pub dev_mode: bool,

    /// The locales that are loaded at startup and updated with newly registered keys.
    pub locales: Vec<String>,

    /// The locale of new request contexts.
    pub default_locale: String,

    /// The directory of the catalog files (`<path>/<locale>.json`).
    pub path: PathBuf,

    /// The name under which the translate capability is exposed to the rendering layer.
    pub translate_alias: String,

    /// Whether newly registered keys are stored as missing marker (`null`) instead of themselves.
    pub update_as_null: bool,

    /// Whether newly registered keys are added to all configured locales or just the requested one.
    pub update_all_locales: bool,
}

impl Config {
    /// Creates a new configuration as described in the [module documentation](crate::config).
    pub fn new() -> Result<Self, ConfigError> {
        // the environment prefix for all `Config` fields
        let env_prefix = env::var("ENV_PREFIX").unwrap_or("tolk".into());
        // the path of the custom configuration file
        let config_file = env::var("CONFIG_FILE").unwrap_or("config/config".into());

        let s = Self::defaults()?
            // load custom configuration from file (at runtime)
            .add_source(File::with_name(&config_file).required(false))
            // add in config from the environment (with a prefix of TOLK)
            // e.g. `TOLK__DEV_MODE=true` would enable the development mode
            .add_source(
                Environment::with_prefix(&env_prefix)
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("locales"),
            )
            .build()?;

        // you can deserialize (and thus freeze) the entire configuration as
        s.try_deserialize()
    }

    /// Creates a configuration from a TOML document that is layered over the default configuration.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Self::defaults()?
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let builder = config::Config::builder()
            .set_default("dev_mode", is_development())?
            // load default configuration (embedded at compile time)
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));
        Ok(builder)
    }

    pub fn with_dev_mode(mut self, dev_mode: bool) -> Self {
        self.dev_mode = dev_mode;
        self
    }

    pub fn with_locales<I, S>(mut self, locales: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.locales = locales.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_default_locale(mut self, default_locale: impl Into<String>) -> Self {
        self.default_locale = default_locale.into();
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_translate_alias(mut self, translate_alias: impl Into<String>) -> Self {
        self.translate_alias = translate_alias.into();
        self
    }

    pub fn with_update_as_null(mut self, update_as_null: bool) -> Self {
        self.update_as_null = update_as_null;
        self
    }

    pub fn with_update_all_locales(mut self, update_all_locales: bool) -> Self {
        self.update_all_locales = update_all_locales;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        let s = Self::defaults()
            .and_then(|builder| builder.build())
            .expect("expected default configuration to be available");

        // you can deserialize (and thus freeze) the entire configuration as
        s.try_deserialize()
            .expect("expected default configuration to be deserializable")
    }
}

/// Whether the process runs in a development environment (`APP_ENV=development`).
pub fn is_development() -> bool {
    env::var(APP_ENV).is_ok_and(|value| value == "development")
}
