use std::path::PathBuf;

/// The error type for all failures around reading and writing translation catalogs.
///
/// Load failures are usually swallowed by the translator (an unreadable catalog is treated as
/// empty), while save failures are always propagated to whoever triggered the write.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The catalog file could not be read or written.
    #[error("failed to access catalog {locale} at {path}: {source}")]
    Io {
        /// The locale of the affected catalog.
        locale: String,
        /// The file that was accessed.
        path: PathBuf,
        /// The cause of the error.
        #[source]
        source: std::io::Error,
    },

    /// The catalog file exists but is not a flat JSON object of strings (or nulls).
    #[error("failed to parse catalog {locale} at {path}: {source}")]
    Parse {
        /// The locale of the affected catalog.
        locale: String,
        /// The file that was parsed.
        path: PathBuf,
        /// The cause of the error.
        #[source]
        source: serde_json::Error,
    },

    /// The in-memory catalog could not be encoded.
    #[error("failed to serialize catalog {locale}: {source}")]
    Serialize {
        /// The locale of the affected catalog.
        locale: String,
        /// The cause of the error.
        #[source]
        source: serde_json::Error,
    },

    /// The staged temporary file could not be moved over the catalog file.
    #[error("failed to replace catalog {locale} at {path}: {source}")]
    Persist {
        /// The locale of the affected catalog.
        locale: String,
        /// The file that should have been replaced.
        path: PathBuf,
        /// The cause of the error.
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Whether this error only means that no catalog file exists (yet).
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
