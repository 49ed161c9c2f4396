//! Error types for the cookie layer.

/// Errors that can occur while reading or writing the session cookie.
#[derive(Debug, thiserror::Error)]
pub enum CookieError {
    /// The request carries no cookie with the configured name.
    #[error("named cookie `{0}` not present")]
    NotFound(String),

    /// The encoded cookie is not a valid header value. Usually a cookie
    /// name or domain containing control characters.
    #[error("invalid cookie header: {0}")]
    InvalidHeader(#[from] http::header::InvalidHeaderValue),

    /// The expiry instant can't be represented in a cookie.
    #[error("cookie expiry out of range: {0}")]
    ExpiryOutOfRange(#[from] time::error::ComponentRange),
}
