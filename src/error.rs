use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

/// The error type of all translation operations.
///
/// Missing translations are never an error. Errors only originate from persisting catalogs
/// (in development mode) and from building the configuration.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A catalog could not be persisted (or read, where this is not tolerated).
    #[error("catalog operation failed: {0}")]
    Catalog(#[from] tolk_catalog::Error),

    /// The configuration could not be assembled or deserialized.
    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        error!(error = %self, "translation failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "translation failed").into_response()
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
