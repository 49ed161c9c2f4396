//! Unified error type for the session manager.

use sessionup_cookie::CookieError;
use sessionup_store::StoreError;

/// Everything that can go wrong while issuing, authenticating, or revoking
/// a session.
///
/// Errors raised while authenticating a request never reach handler code:
/// they are handed to the manager's [`Reject`](crate::Reject) hook, which
/// turns them into the response. Errors from [`Manager::init`], the revoke
/// operations, and [`Manager::fetch_all`] are returned to the caller.
///
/// [`Manager::init`]: crate::Manager::init
/// [`Manager::fetch_all`]: crate::Manager::fetch_all
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The request carries no session cookie.
    #[error("named cookie `{0}` not present")]
    CookieMissing(String),

    /// A session cookie was presented but the store has no such session.
    #[error("unauthorized")]
    Unauthorized,

    /// The store failed. The store's own error is kept intact so callers
    /// can match on it.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The session cookie could not be written.
    #[error(transparent)]
    Cookie(CookieError),
}

/// A missing cookie becomes [`SessionError::CookieMissing`]; every other
/// cookie failure is kept as [`SessionError::Cookie`].
impl From<CookieError> for SessionError {
    fn from(err: CookieError) -> Self {
        match err {
            CookieError::NotFound(name) => Self::CookieMissing(name),
            other => Self::Cookie(other),
        }
    }
}
