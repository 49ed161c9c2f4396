//! Cookie attributes applied to every session cookie.

pub use cookie::SameSite;

/// The cookie name used when none is configured.
pub const DEFAULT_COOKIE_NAME: &str = "sessionup";

// ---------------------------------------------------------------------------
// CookieConfig
// ---------------------------------------------------------------------------

/// Attributes of the session cookie.
///
/// The defaults are the strict end of the spectrum: HTTPS only, invisible
/// to JavaScript, never sent cross-site. Override only the fields you need:
///
/// ```rust
/// use sessionup_cookie::{CookieConfig, SameSite};
///
/// let config = CookieConfig {
///     same_site: SameSite::Lax,
///     ..CookieConfig::default()
/// };
/// assert_eq!(config.name, "sessionup");
/// ```
///
/// More on each attribute:
/// <https://developer.mozilla.org/en-US/docs/Web/HTTP/Cookies>
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieConfig {
    /// Cookie name. Default: `"sessionup"`.
    pub name: String,

    /// `Path` attribute. Default: `"/"`.
    pub path: String,

    /// `Domain` attribute. `None` (the default) makes a host-only cookie.
    pub domain: Option<String>,

    /// `Secure` attribute. Default: `true`.
    pub secure: bool,

    /// `HttpOnly` attribute. Default: `true`.
    pub http_only: bool,

    /// `SameSite` attribute. Default: [`SameSite::Strict`].
    pub same_site: SameSite,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_COOKIE_NAME.to_string(),
            path: "/".to_string(),
            domain: None,
            secure: true,
            http_only: true,
            same_site: SameSite::Strict,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_config_default() {
        let config = CookieConfig::default();
        assert_eq!(config.name, "sessionup");
        assert_eq!(config.path, "/");
        assert_eq!(config.domain, None);
        assert!(config.secure);
        assert!(config.http_only);
        assert_eq!(config.same_site, SameSite::Strict);
    }
}
