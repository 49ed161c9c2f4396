//! Authentication middleware: from cookie to bound session.
//!
//! Each request goes through three steps:
//!   1. **Extract** — read the session cookie. Missing → reject, the store
//!      is never called.
//!   2. **Resolve** — look the ID up in the store. Store error → reject
//!      with that error. Unknown ID → reject with `Unauthorized`.
//!   3. **Bind** — attach the session to the request's extensions and
//!      forward to the next handler.
//!
//! Rejections are produced by the manager's [`Reject`](crate::Reject) hook;
//! handler code never sees authentication errors. Nothing is retried.
//!
//! # Wiring
//!
//! ```rust,no_run
//! use axum::{Router, middleware, routing::get};
//! use chrono::TimeDelta;
//! use sessionup::{AuthSession, Manager, MemoryStore};
//!
//! async fn me(AuthSession(session): AuthSession) -> String {
//!     session.user_key
//! }
//!
//! let manager = Manager::builder(MemoryStore::new())
//!     .expires_in(TimeDelta::days(7))
//!     .build();
//!
//! let app: Router = Router::new()
//!     .route("/me", get(me))
//!     .layer(middleware::from_fn_with_state(manager.clone(), sessionup::auth::<MemoryStore>));
//! ```

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use sessionup_store::{Session, Store};

use crate::manager::short_id;
use crate::{Manager, SessionError, context};

impl<S: Store> Manager<S> {
    /// Resolves the session named by the request's cookie.
    ///
    /// `cookie` is the result of decoding the cookie, taken before any
    /// await so the request itself is not borrowed across the store call.
    async fn resolve(
        &self,
        cookie: Result<String, SessionError>,
    ) -> Result<Session, SessionError> {
        let id = cookie?;
        match self.store.fetch_by_id(&id).await {
            Ok(Some(session)) => Ok(session),
            Ok(None) => Err(SessionError::Unauthorized),
            Err(e) => {
                tracing::warn!(
                    session = short_id(&id),
                    error = %e,
                    "store failed while authenticating"
                );
                Err(e.into())
            }
        }
    }

    /// Authenticates `request`, rejecting it if no valid session is found.
    ///
    /// On success the session is bound to the request (see
    /// [`context::lookup`]) and `next` runs exactly once.
    pub async fn authenticate(&self, mut request: Request, next: Next) -> Response {
        context::bind_reject(request.extensions_mut(), Arc::clone(&self.config.reject));
        let cookie = self
            .config
            .cookie
            .decode(request.headers())
            .map_err(SessionError::from);

        match self.resolve(cookie).await {
            Ok(session) => {
                context::bind(request.extensions_mut(), session);
                next.run(request).await
            }
            Err(err) => {
                tracing::debug!(
                    path = %request.uri().path(),
                    cause = %err,
                    "request rejected"
                );
                self.config.reject.reject(err)
            }
        }
    }

    /// Authenticates `request` if it can, and forwards it either way.
    ///
    /// A resolved session is bound exactly as in
    /// [`authenticate`](Self::authenticate). Missing cookies and unknown
    /// sessions are forwarded anonymously; store failures are logged and
    /// also forwarded anonymously.
    pub async fn authenticate_optional(
        &self,
        mut request: Request,
        next: Next,
    ) -> Response {
        context::bind_reject(request.extensions_mut(), Arc::clone(&self.config.reject));
        let cookie = self
            .config
            .cookie
            .decode(request.headers())
            .map_err(SessionError::from);

        match self.resolve(cookie).await {
            Ok(session) => context::bind(request.extensions_mut(), session),
            Err(err) => {
                tracing::trace!(cause = %err, "continuing without session");
            }
        }
        next.run(request).await
    }
}

/// Middleware function rejecting unauthenticated requests.
///
/// Use with [`axum::middleware::from_fn_with_state`], passing the manager
/// as state.
pub async fn auth<S: Store>(
    State(manager): State<Manager<S>>,
    request: Request,
    next: Next,
) -> Response {
    manager.authenticate(request, next).await
}

/// Middleware function binding a session when one is presented, without
/// ever rejecting.
///
/// Pair it with `Option<AuthSession>` in handlers.
pub async fn public<S: Store>(
    State(manager): State<Manager<S>>,
    request: Request,
    next: Next,
) -> Response {
    manager.authenticate_optional(request, next).await
}
