//! Cookie-backed, in-process session store.
//!
//! [`session_layer`] resolves the session cookie of every request into a [`Session`] handle
//! placed in the request extensions. Handlers read and write the handle (it is also an
//! extractor); once the handler returns, the layer writes modified data back to the store and
//! issues `Set-Cookie` when a new session was created or an existing one became empty.

use crate::safe_nanoid;
use crate::server::error::ApiError;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use cookie::time::Duration as CookieDuration;
use cookie::{Cookie, SameSite};
use fxhash::FxHashMap;
use moka::sync::Cache;
use parking_lot::Mutex;
use paywall_domain::config::SessionConfig;
use paywall_domain::constants::{SESSION_PAGE_VIEWS, SESSION_USER_ID};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

const SESSION_ID_LENGTH: usize = 32;

/// Named values stored for one client.
pub type SessionRecord = FxHashMap<String, Value>;

#[derive(Debug)]
struct SessionStoreInner {
    cache: Cache<String, SessionRecord>,
    cookie_name: String,
    idle_timeout: Duration,
    secure: bool,
}

/// Bounded session storage; entries idle longer than the configured timeout are dropped.
#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: Arc<SessionStoreInner>,
}

impl SessionStore {
    /// Creates a store from the `session` config section. `secure` adds the `Secure` cookie
    /// attribute and should follow whether the server terminates TLS.
    #[must_use]
    pub fn new(config: &SessionConfig, secure: bool) -> Self {
        let idle_timeout = Duration::from_secs(config.idle_timeout_seconds.max(1));
        let cache = Cache::builder()
            .max_capacity(config.capacity)
            .time_to_idle(idle_timeout)
            .build();

        Self {
            inner: Arc::new(SessionStoreInner {
                cache,
                cookie_name: config.cookie_name.clone(),
                idle_timeout,
                secure,
            }),
        }
    }

    #[must_use]
    pub fn cookie_name(&self) -> &str {
        &self.inner.cookie_name
    }

    /// Number of live sessions, after pending evictions have been applied.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.inner.cache.run_pending_tasks();
        self.inner.cache.entry_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolves the session named by the request cookie. Unknown or expired ids yield a fresh,
    /// unsaved session.
    #[must_use]
    pub fn resolve(&self, headers: &HeaderMap) -> Session {
        let Some(id) = session_cookie(headers, &self.inner.cookie_name) else {
            return Session::default();
        };

        match self.inner.cache.get(&id) {
            Some(data) => Session::restore(id, data),
            None => {
                debug!("Session cookie refers to an unknown or expired session");
                Session::default()
            },
        }
    }

    /// Writes a modified session back to the store.
    ///
    /// Returns the `Set-Cookie` value to send, if any: a new cookie for a session saved for
    /// the first time, an expiring one for a stored session whose data became empty.
    pub fn commit(&self, session: &Session) -> Option<String> {
        let mut state = session.state.lock();
        if !state.modified {
            return None;
        }
        state.modified = false;

        if state.data.is_empty() {
            let id = state.id.take()?;
            self.inner.cache.invalidate(&id);
            debug!("Session emptied and removed");
            return Some(self.expired_cookie());
        }

        match &state.id {
            Some(id) => {
                self.inner.cache.insert(id.clone(), state.data.clone());
                None
            },
            None => {
                let id = safe_nanoid!(SESSION_ID_LENGTH);
                self.inner.cache.insert(id.clone(), state.data.clone());
                let cookie = self.cookie(&id);
                state.id = Some(id);
                debug!("New session created");
                Some(cookie)
            },
        }
    }

    fn cookie(&self, id: &str) -> String {
        let max_age =
            CookieDuration::try_from(self.inner.idle_timeout).unwrap_or(CookieDuration::MAX);
        self.cookie_builder(id).max_age(max_age).build().to_string()
    }

    fn expired_cookie(&self) -> String {
        self.cookie_builder("").max_age(CookieDuration::ZERO).build().to_string()
    }

    fn cookie_builder<'c>(&'c self, value: &'c str) -> cookie::CookieBuilder<'c> {
        Cookie::build((self.inner.cookie_name.as_str(), value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.inner.secure)
    }
}

fn session_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == name && !cookie.value().is_empty())
        .map(|cookie| cookie.value().to_owned())
}

#[derive(Debug, Default)]
struct SessionState {
    id: Option<String>,
    data: SessionRecord,
    modified: bool,
}

/// Per-request handle to one client's session data.
///
/// Cloning is cheap and every clone sees the same data. Changes become visible to later
/// requests once [`SessionStore::commit`] runs, which [`session_layer`] does after the handler.
#[derive(Debug, Clone, Default)]
pub struct Session {
    state: Arc<Mutex<SessionState>>,
}

impl Session {
    fn restore(id: String, data: SessionRecord) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState { id: Some(id), data, modified: false })),
        }
    }

    /// The id of a stored session, `None` until the session is first committed.
    #[must_use]
    pub fn id(&self) -> Option<String> {
        self.state.lock().id.clone()
    }

    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.state.lock().modified
    }

    /// Reads and decodes a value. Absent keys and values of another shape read as `None`.
    #[must_use]
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let state = self.state.lock();
        let value = state.data.get(key)?.clone();
        drop(state);
        serde_json::from_value(value).ok()
    }

    pub fn insert(&self, key: impl Into<String>, value: impl Into<Value>) {
        let mut state = self.state.lock();
        state.data.insert(key.into(), value.into());
        state.modified = true;
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        let mut state = self.state.lock();
        let removed = state.data.remove(key);
        if removed.is_some() {
            state.modified = true;
        }
        removed
    }

    /// Drops every value; the stored session is destroyed on commit.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.data.clear();
        state.modified = true;
    }

    // --- Typed accessors ---

    #[must_use]
    pub fn user_id(&self) -> Option<i64> {
        self.get(SESSION_USER_ID)
    }

    pub fn set_user_id(&self, id: i64) {
        self.insert(SESSION_USER_ID, id);
    }

    pub fn remove_user_id(&self) {
        self.remove(SESSION_USER_ID);
    }

    /// Single-article views attempted so far; `0` when never set.
    #[must_use]
    pub fn page_views(&self) -> u32 {
        self.get(SESSION_PAGE_VIEWS).unwrap_or(0)
    }

    pub fn set_page_views(&self, views: u32) {
        self.insert(SESSION_PAGE_VIEWS, views);
    }
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or_else(|| ApiError::from("Session layer is not installed"))
    }
}

/// Middleware binding a [`Session`] to every request and persisting it afterwards.
///
/// Install with `axum::middleware::from_fn_with_state(store, session_layer)`.
pub async fn session_layer(
    State(store): State<SessionStore>,
    mut request: Request,
    next: Next,
) -> Response {
    let session = store.resolve(request.headers());
    request.extensions_mut().insert(session.clone());

    let mut response = next.run(request).await;

    if let Some(cookie) = store.commit(&session) {
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            },
            Err(e) => warn!(error = %e, "Session cookie is not a valid header value"),
        }
    }

    response
}
