//! The request binding installs a per-request translation context into an [axum] router.
//!
//! The [middleware] creates an [I18n] context for every request and stores it in the request
//! extensions. Handlers obtain it with the [I18n] extractor, rendering layers with the [Locals]
//! extractor, which exposes the translate capability under the configured alias.
//!
//! ```rs
//! let translator = Arc::new(Translator::from_env()?);
//! let app = Router::new()
//!     .route("/", get(index))
//!     .with_i18n(translator);
//!
//! async fn index(i18n: I18n) -> Result<String, tolk::Error> {
//!     i18n.translate("Hello %s", &[json!("world")])
//! }
//! ```

use crate::error::Result;
use crate::translator::Translator;
use axum::Router;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::middleware::{Next, from_fn_with_state};
use axum::response::Response;
use serde_json::Value;
use std::fmt::{Debug, Formatter};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tolk_catalog::JsonFileBackend;
use tolk_catalog::backend::CatalogBackend;
use tracing::{Instrument, info_span, trace};
use uuid::Uuid;

/// The name under which [Locals] exposes the [I18n] context itself.
pub const I18N_LOCAL: &str = "i18n";

/// The rejection if a context is extracted without the [middleware] being installed.
pub const MISSING_MIDDLEWARE: (StatusCode, &str) = (
    StatusCode::INTERNAL_SERVER_ERROR,
    "i18n middleware is not installed",
);

/// [I18n] is the translation context of a single request.
///
/// It starts with the configured default locale. Translations are delegated to the shared
/// [Translator] using the current locale of the context. In development mode, the catalog of the
/// current locale is reloaded from disk before the first translation (and again after the locale
/// changed), so edited catalog files take effect without a restart.
///
/// Clones are handles to the same context: a locale switched through one clone is seen by all
/// others, which is how the [I18n] and [Locals] extractors of one request stay in sync.
pub struct I18n<B = JsonFileBackend> {
    translator: Arc<Translator<B>>,
    request_id: Uuid,
    state: Arc<Mutex<ContextState>>,
}

#[derive(Debug)]
struct ContextState {
    locale: String,
    refreshed: bool,
}

impl<B> I18n<B>
where
    B: CatalogBackend,
{
    pub fn new(translator: Arc<Translator<B>>) -> Self {
        let locale = translator.default_locale().to_owned();
        Self {
            translator,
            request_id: Uuid::new_v4(),
            state: Arc::new(Mutex::new(ContextState {
                locale,
                refreshed: false,
            })),
        }
    }

    /// The identifier of the request this context belongs to.
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn translator(&self) -> &Arc<Translator<B>> {
        &self.translator
    }

    pub fn locale(&self) -> String {
        self.state().locale.clone()
    }

    /// Switches the locale of this context. Switching to another locale re-arms the development
    /// mode reload.
    pub fn set_locale(&self, locale: impl Into<String>) {
        let locale = locale.into();
        let mut state = self.state();
        if state.locale != locale {
            trace!(from = %state.locale, to = %locale, "switching locale");
            state.refreshed = false;
        }
        state.locale = locale;
    }

    /// Translates the source string to the current locale (see [Translator::translate]).
    pub fn translate(&self, source: &str, args: &[Value]) -> Result<String> {
        let locale = {
            let mut state = self.state();
            if self.translator.is_dev_mode() && !state.refreshed {
                self.translator.reload(&state.locale);
                state.refreshed = true;
            }
            state.locale.clone()
        };
        self.translator.translate(&locale, source, args)
    }

    fn state(&self) -> MutexGuard<'_, ContextState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<B> Clone for I18n<B> {
    fn clone(&self) -> Self {
        Self {
            translator: Arc::clone(&self.translator),
            request_id: self.request_id,
            state: Arc::clone(&self.state),
        }
    }
}

impl<B> Debug for I18n<B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("I18n")
            .field("request_id", &self.request_id)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<S, B> FromRequestParts<S> for I18n<B>
where
    S: Send + Sync,
    B: CatalogBackend + 'static,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<I18n<B>>()
            .cloned()
            .ok_or(MISSING_MIDDLEWARE)
    }
}

/// [Locals] exposes the request context to a rendering layer by name.
///
/// The context itself is available as [I18N_LOCAL] and its translate function under the configured
/// translate alias (`_` by default).
#[derive(Debug)]
pub struct Locals<B = JsonFileBackend> {
    i18n: I18n<B>,
    translate_alias: String,
}

impl<B> Locals<B>
where
    B: CatalogBackend,
{
    pub fn new(i18n: I18n<B>) -> Self {
        let translate_alias = i18n.translator().config().translate_alias.clone();
        Self {
            i18n,
            translate_alias,
        }
    }

    pub fn translate_alias(&self) -> &str {
        &self.translate_alias
    }

    /// Returns the context if it is requested by its name.
    pub fn context(&self, name: &str) -> Option<&I18n<B>> {
        (name == I18N_LOCAL).then_some(&self.i18n)
    }

    /// Returns the translate function if it is requested by the translate alias.
    pub fn translate_fn(
        &self,
        name: &str,
    ) -> Option<impl Fn(&str, &[Value]) -> Result<String> + use<B>> {
        if name != self.translate_alias {
            return None;
        }
        let i18n = self.i18n.clone();
        Some(move |source: &str, args: &[Value]| i18n.translate(source, args))
    }

    pub fn into_inner(self) -> I18n<B> {
        self.i18n
    }
}

impl<S, B> FromRequestParts<S> for Locals<B>
where
    S: Send + Sync,
    B: CatalogBackend + 'static,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let i18n = I18n::<B>::from_request_parts(parts, state).await?;
        Ok(Locals::new(i18n))
    }
}

/// Creates the translation context of a request and passes the request on.
///
/// This never short-circuits the request. Install it with [from_fn_with_state] and the shared
/// translator as state, or use [I18nRouterExt::with_i18n].
pub async fn middleware<B>(
    State(translator): State<Arc<Translator<B>>>,
    mut request: Request,
    next: Next,
) -> Response
where
    B: CatalogBackend + 'static,
{
    let i18n = I18n::new(translator);
    let span = info_span!(
        "i18n",
        request_id = %i18n.request_id(),
        locale = %i18n.locale(),
    );
    request.extensions_mut().insert(i18n);
    next.run(request).instrument(span).await
}

/// Extension for [Router] to install the translation [middleware].
pub trait I18nRouterExt {
    /// Installs the translation middleware for all routes of this router.
    fn with_i18n<B>(self, translator: Arc<Translator<B>>) -> Self
    where
        B: CatalogBackend + 'static;
}

impl<S> I18nRouterExt for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_i18n<B>(self, translator: Arc<Translator<B>>) -> Self
    where
        B: CatalogBackend + 'static,
    {
        self.layer(from_fn_with_state(translator, middleware::<B>))
    }
}
