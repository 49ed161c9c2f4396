//! Mapping between session identity and the `Cookie`/`Set-Cookie` headers.
//!
//! The codec knows three things:
//! - how to **encode** a session ID and expiry into a `Set-Cookie` header
//! - how to **decode** the session ID back out of a request's `Cookie` headers
//! - how to **delete** the cookie on the client
//!
//! It knows nothing about stores or requests beyond their headers.

use chrono::{DateTime, TimeDelta, Utc};
use cookie::Cookie;
use http::header::{COOKIE, SET_COOKIE};
use http::{HeaderMap, HeaderValue};
use time::OffsetDateTime;

use crate::{CookieConfig, CookieError};

/// How many days in the past a deletion cookie's `Expires` is set.
///
/// Anything more than a day tolerates client clock skew; 30 days makes
/// eviction immediate regardless of the original expiry.
pub const DELETION_OFFSET_DAYS: i64 = 30;

/// Encodes and decodes the session cookie according to a [`CookieConfig`].
#[derive(Debug, Clone, Default)]
pub struct CookieCodec {
    config: CookieConfig,
}

impl CookieCodec {
    /// Creates a codec for the given cookie attributes.
    pub fn new(config: CookieConfig) -> Self {
        Self { config }
    }

    /// Returns the attributes this codec applies.
    pub fn config(&self) -> &CookieConfig {
        &self.config
    }

    /// Builds the session cookie carrying `value`.
    ///
    /// `Expires` is set only when `expires_at` is `Some`; otherwise the
    /// browser keeps the cookie for the current browsing session only.
    ///
    /// # Errors
    /// Returns [`CookieError::ExpiryOutOfRange`] if `expires_at` can't be
    /// represented as a cookie date.
    pub fn encode(
        &self,
        value: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Cookie<'static>, CookieError> {
        let mut builder =
            Cookie::build((self.config.name.clone(), value.to_string()))
                .path(self.config.path.clone())
                .secure(self.config.secure)
                .http_only(self.config.http_only)
                .same_site(self.config.same_site);

        if let Some(domain) = &self.config.domain {
            builder = builder.domain(domain.clone());
        }

        if let Some(exp) = expires_at {
            builder = builder
                .expires(OffsetDateTime::from_unix_timestamp(exp.timestamp())?);
        }

        Ok(builder.build())
    }

    /// Renders the session cookie as a `Set-Cookie` header value.
    ///
    /// # Errors
    /// See [`encode`](Self::encode); also fails with
    /// [`CookieError::InvalidHeader`] if the rendered cookie is not a
    /// valid header value.
    pub fn header(
        &self,
        value: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<HeaderValue, CookieError> {
        let cookie = self.encode(value, expires_at)?;
        Ok(HeaderValue::from_str(&cookie.to_string())?)
    }

    /// Appends a `Set-Cookie` header carrying the session ID.
    ///
    /// Nothing is appended on error.
    pub fn set(
        &self,
        headers: &mut HeaderMap,
        value: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<(), CookieError> {
        headers.append(SET_COOKIE, self.header(value, expires_at)?);
        Ok(())
    }

    /// Renders the `Set-Cookie` value that makes the client drop the
    /// session cookie: empty value, expiry [`DELETION_OFFSET_DAYS`] ago.
    pub fn deletion_header(&self) -> Result<HeaderValue, CookieError> {
        let expired = Utc::now() - TimeDelta::days(DELETION_OFFSET_DAYS);
        self.header("", Some(expired))
    }

    /// Appends the header from [`deletion_header`](Self::deletion_header).
    pub fn delete(&self, headers: &mut HeaderMap) -> Result<(), CookieError> {
        headers.append(SET_COOKIE, self.deletion_header()?);
        Ok(())
    }

    /// Extracts the session cookie's value from a request's headers.
    ///
    /// Every `Cookie` header is scanned; the first pair with the configured
    /// name wins. Unparseable pairs are skipped.
    ///
    /// # Errors
    /// Returns [`CookieError::NotFound`] if no such cookie is present.
    pub fn decode(&self, headers: &HeaderMap) -> Result<String, CookieError> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| Cookie::parse(pair.trim()).ok())
            .find(|cookie| cookie.name() == self.config.name)
            .map(|cookie| cookie.value().to_string())
            .ok_or_else(|| CookieError::NotFound(self.config.name.clone()))
    }
}
