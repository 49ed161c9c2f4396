//! Manager configuration and its builder.
//!
//! A [`Manager`] is configured once and never mutated afterwards. To run a
//! second manager with slightly different settings (say, a longer-lived
//! "remember me" cookie), copy the configuration into a new builder with
//! [`Manager::to_builder`], override what differs, and build again. Both
//! managers share the same store.

use std::sync::Arc;

use chrono::TimeDelta;
use sessionup_cookie::{CookieCodec, CookieConfig, SameSite};
use sessionup_store::Store;

use crate::{GenerateId, JsonReject, Manager, RandomId, Reject};

/// Longest accepted session lifetime, in days. Longer values passed to
/// [`ManagerBuilder::expires_in`] are clamped to it so `created_at +
/// expires_in` always stays inside the representable date range.
pub const MAX_EXPIRES_IN_DAYS: i64 = 365 * 100;

/// Immutable settings shared by every clone of a [`Manager`].
pub(crate) struct Config {
    pub(crate) cookie: CookieCodec,
    pub(crate) expires_in: Option<TimeDelta>,
    pub(crate) with_ip: bool,
    pub(crate) with_agent: bool,
    pub(crate) gen_id: Arc<dyn GenerateId>,
    pub(crate) reject: Arc<dyn Reject>,
}

/// Builder for configuring a [`Manager`].
///
/// # Example
///
/// ```rust
/// use chrono::TimeDelta;
/// use sessionup::{Manager, MemoryStore, SameSite};
///
/// let manager = Manager::builder(MemoryStore::new())
///     .cookie_name("sid")
///     .same_site(SameSite::Lax)
///     .expires_in(TimeDelta::days(14))
///     .with_ip(false)
///     .build();
///
/// assert_eq!(manager.cookie_config().name, "sid");
/// ```
pub struct ManagerBuilder<S: Store> {
    store: Arc<S>,
    cookie: CookieConfig,
    expires_in: Option<TimeDelta>,
    with_ip: bool,
    with_agent: bool,
    gen_id: Arc<dyn GenerateId>,
    reject: Arc<dyn Reject>,
}

impl<S: Store> ManagerBuilder<S> {
    /// Creates a builder with default settings around `store`.
    ///
    /// Defaults: [`CookieConfig::default`], no expiry, IP and User-Agent
    /// capture on, [`RandomId`] IDs, [`JsonReject`] rejections.
    pub fn new(store: S) -> Self {
        Self::with_shared_store(Arc::new(store))
    }

    pub(crate) fn with_shared_store(store: Arc<S>) -> Self {
        Self {
            store,
            cookie: CookieConfig::default(),
            expires_in: None,
            with_ip: true,
            with_agent: true,
            gen_id: Arc::new(RandomId::default()),
            reject: Arc::new(JsonReject),
        }
    }

    pub(crate) fn from_manager(manager: &Manager<S>) -> Self {
        let config = &manager.config;
        Self {
            store: Arc::clone(&manager.store),
            cookie: config.cookie.config().clone(),
            expires_in: config.expires_in,
            with_ip: config.with_ip,
            with_agent: config.with_agent,
            gen_id: Arc::clone(&config.gen_id),
            reject: Arc::clone(&config.reject),
        }
    }

    /// Replaces all cookie attributes at once.
    pub fn cookie(mut self, cookie: CookieConfig) -> Self {
        self.cookie = cookie;
        self
    }

    /// Sets the cookie name. Default: `"sessionup"`.
    pub fn cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie.name = name.into();
        self
    }

    /// Sets the `Domain` attribute. Default: unset (host-only cookie).
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.cookie.domain = Some(domain.into());
        self
    }

    /// Sets the `Path` attribute. Default: `"/"`.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.cookie.path = path.into();
        self
    }

    /// Sets the `Secure` attribute. Default: `true`.
    pub fn secure(mut self, secure: bool) -> Self {
        self.cookie.secure = secure;
        self
    }

    /// Sets the `HttpOnly` attribute. Default: `true`.
    pub fn http_only(mut self, http_only: bool) -> Self {
        self.cookie.http_only = http_only;
        self
    }

    /// Sets the `SameSite` attribute. Default: [`SameSite::Strict`].
    pub fn same_site(mut self, same_site: SameSite) -> Self {
        self.cookie.same_site = same_site;
        self
    }

    /// Sets how long new sessions live.
    ///
    /// Sessions get `expires_at = created_at + expires_in`, are persisted
    /// in the store, and the cookie carries a matching `Expires`. A zero
    /// or negative duration clears the setting, and anything longer than
    /// [`MAX_EXPIRES_IN_DAYS`] is clamped to it. Default: unset, meaning
    /// browser-session cookies that are never stored.
    pub fn expires_in(mut self, expires_in: TimeDelta) -> Self {
        let max = TimeDelta::days(MAX_EXPIRES_IN_DAYS);
        self.expires_in = (expires_in > TimeDelta::zero()).then(|| expires_in.min(max));
        self
    }

    /// Sets whether the client IP is captured on new sessions.
    /// Default: `true`.
    pub fn with_ip(mut self, with_ip: bool) -> Self {
        self.with_ip = with_ip;
        self
    }

    /// Sets whether the `User-Agent` header is captured on new sessions.
    /// Default: `true`.
    pub fn with_agent(mut self, with_agent: bool) -> Self {
        self.with_agent = with_agent;
        self
    }

    /// Sets the session ID generator. Default: [`RandomId`].
    pub fn gen_id(mut self, gen_id: impl GenerateId) -> Self {
        self.gen_id = Arc::new(gen_id);
        self
    }

    /// Sets the rejection hook used by the authentication middleware.
    /// Default: [`JsonReject`].
    pub fn reject(mut self, reject: impl Reject) -> Self {
        self.reject = Arc::new(reject);
        self
    }

    /// Freezes the configuration into a [`Manager`].
    pub fn build(self) -> Manager<S> {
        Manager {
            store: self.store,
            config: Arc::new(Config {
                cookie: CookieCodec::new(self.cookie),
                expires_in: self.expires_in,
                with_ip: self.with_ip,
                with_agent: self.with_agent,
                gen_id: self.gen_id,
                reject: self.reject,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use sessionup_store::MemoryStore;

    use super::*;

    #[test]
    fn test_builder_defaults() {
        let manager = Manager::new(MemoryStore::new());

        assert_eq!(manager.cookie_config(), &CookieConfig::default());
        assert_eq!(manager.expires_in(), None);
        assert!(manager.config.with_ip);
        assert!(manager.config.with_agent);
    }

    #[test]
    fn test_builder_setters_apply() {
        let manager = Manager::builder(MemoryStore::new())
            .cookie_name("sid")
            .domain("example.com")
            .path("/app")
            .secure(false)
            .http_only(false)
            .same_site(SameSite::None)
            .expires_in(TimeDelta::hours(3))
            .with_ip(false)
            .with_agent(false)
            .gen_id(|| "fixed".to_string())
            .build();

        let cookie = manager.cookie_config();
        assert_eq!(cookie.name, "sid");
        assert_eq!(cookie.domain.as_deref(), Some("example.com"));
        assert_eq!(cookie.path, "/app");
        assert!(!cookie.secure);
        assert!(!cookie.http_only);
        assert_eq!(cookie.same_site, SameSite::None);
        assert_eq!(manager.expires_in(), Some(TimeDelta::hours(3)));
        assert!(!manager.config.with_ip);
        assert!(!manager.config.with_agent);
        assert_eq!(manager.config.gen_id.generate(), "fixed");
    }

    #[test]
    fn test_expires_in_zero_clears_expiry() {
        let manager = Manager::builder(MemoryStore::new())
            .expires_in(TimeDelta::hours(1))
            .expires_in(TimeDelta::zero())
            .build();

        assert_eq!(manager.expires_in(), None);
    }

    #[test]
    fn test_expires_in_huge_is_clamped() {
        let manager = Manager::builder(MemoryStore::new())
            .expires_in(TimeDelta::MAX)
            .build();

        assert_eq!(
            manager.expires_in(),
            Some(TimeDelta::days(MAX_EXPIRES_IN_DAYS))
        );
    }

    #[test]
    fn test_to_builder_overrides_copy_and_shares_store() {
        let base = Manager::builder(MemoryStore::new())
            .cookie_name("sid")
            .expires_in(TimeDelta::hours(1))
            .build();

        let derived = base
            .to_builder()
            .expires_in(TimeDelta::days(30))
            .build();

        // The original is untouched.
        assert_eq!(base.expires_in(), Some(TimeDelta::hours(1)));
        // The copy keeps everything it didn't override.
        assert_eq!(derived.cookie_config().name, "sid");
        assert_eq!(derived.expires_in(), Some(TimeDelta::days(30)));
        assert!(std::ptr::eq(base.store(), derived.store()));
    }
}
