//! Binding the authenticated session to the request being processed.
//!
//! The request's [`Extensions`] map is its context: a typed key-value store
//! that lives exactly as long as the request. The authentication middleware
//! [`bind`]s the resolved session there; handlers and the revoke operations
//! [`lookup`] it without asking the store again.
//!
//! A session is only ever present after the middleware resolved one. Its
//! absence is a normal condition for routes that may run unauthenticated.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::response::Response;
use http::Extensions;
use http::request::Parts;
use sessionup_store::Session;

use crate::{JsonReject, Reject, SessionError};

/// Private key type: only this module can insert or read the binding, so
/// nothing else in the extensions map can be mistaken for it.
#[derive(Clone)]
struct Bound(Session);

/// Attaches `session` to a request context, replacing any earlier binding.
pub fn bind(extensions: &mut Extensions, session: Session) {
    extensions.insert(Bound(session));
}

/// Returns the session bound to a request context, if any.
pub fn lookup(extensions: &Extensions) -> Option<&Session> {
    extensions.get::<Bound>().map(|bound| &bound.0)
}

/// The rejection hook of the manager whose middleware saw the request.
#[derive(Clone)]
struct RejectWith(Arc<dyn Reject>);

/// Records the manager's rejection hook on a request context.
pub(crate) fn bind_reject(extensions: &mut Extensions, reject: Arc<dyn Reject>) {
    extensions.insert(RejectWith(reject));
}

fn reject(extensions: &Extensions, err: SessionError) -> Response {
    match extensions.get::<RejectWith>() {
        Some(RejectWith(hook)) => hook.reject(err),
        None => JsonReject.reject(err),
    }
}

// ---------------------------------------------------------------------------
// AuthSession extractor
// ---------------------------------------------------------------------------

/// Extractor for the session bound by the authentication middleware.
///
/// As a plain argument it rejects with `Unauthorized` when no session is
/// bound. The response comes from the rejection hook of the manager whose
/// [`auth`](crate::auth) or [`public`](crate::public) middleware ran on the
/// request, or from [`JsonReject`] when neither did. Use
/// `Option<AuthSession>` on routes behind [`public`](crate::public) where
/// anonymous requests are fine.
///
/// ```rust,ignore
/// async fn me(AuthSession(session): AuthSession) -> String {
///     session.user_key
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthSession(pub Session);

impl<S> FromRequestParts<S> for AuthSession
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        lookup(&parts.extensions)
            .cloned()
            .map(AuthSession)
            .ok_or_else(|| reject(&parts.extensions, SessionError::Unauthorized))
    }
}

impl<S> OptionalFromRequestParts<S> for AuthSession
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(lookup(&parts.extensions).cloned().map(AuthSession))
    }
}
