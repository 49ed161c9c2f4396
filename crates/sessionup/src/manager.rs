//! The session manager: issues, lists, and revokes sessions.
//!
//! This is the central piece of the crate. It's responsible for:
//! - Building new sessions from an incoming request ([`Manager::init`])
//! - Revoking one, all-but-one, or all sessions of a user
//! - Listing a user's sessions with the caller's own one marked
//!
//! Authenticating requests lives in [`crate::middleware`].
//!
//! # Concurrency note
//!
//! `Manager` holds no mutable state. Its configuration is frozen at build
//! time and every operation only touches its own request, response headers,
//! and store calls, so clones can be used from any number of requests at
//! once without coordination.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::ConnectInfo;
use chrono::{TimeDelta, Utc};
use http::header::{SET_COOKIE, USER_AGENT};
use http::request::Parts;
use http::{Extensions, HeaderMap};
use sessionup_cookie::CookieConfig;
use sessionup_store::{Session, Store};

use crate::config::Config;
use crate::{ManagerBuilder, SessionError, context};

/// Creates, authenticates, and revokes cookie-backed sessions stored in `S`.
///
/// ## Lifecycle
///
/// ```text
/// init() ──→ store.create() ──→ Set-Cookie
///                                   │
///      (later requests carry the cookie)
///                                   ▼
///                 auth middleware ──→ store.fetch_by_id() ──→ bind to context
///                                                                  │
///                       revoke() / revoke_other() / revoke_all() ◄─┘
/// ```
///
/// Cloning is cheap: the store and configuration sit behind `Arc`s.
pub struct Manager<S: Store> {
    pub(crate) store: Arc<S>,
    pub(crate) config: Arc<Config>,
}

impl<S: Store> Clone for Manager<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S: Store> Manager<S> {
    /// Creates a manager with default settings.
    pub fn new(store: S) -> Self {
        ManagerBuilder::new(store).build()
    }

    /// Starts configuring a manager around `store`.
    pub fn builder(store: S) -> ManagerBuilder<S> {
        ManagerBuilder::new(store)
    }

    /// Copies this manager's configuration into a new builder that shares
    /// the same store. `self` is left unchanged.
    pub fn to_builder(&self) -> ManagerBuilder<S> {
        ManagerBuilder::from_manager(self)
    }

    /// Returns the store sessions are persisted in.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the session cookie's attributes.
    pub fn cookie_config(&self) -> &CookieConfig {
        self.config.cookie.config()
    }

    /// Returns the configured session lifetime, if any.
    pub fn expires_in(&self) -> Option<TimeDelta> {
        self.config.expires_in
    }

    /// Builds a new session for `key` without storing it.
    ///
    /// The ID comes from the configured generator; `expires_at` is set when
    /// a lifetime is configured. The client IP (from axum's
    /// [`ConnectInfo`], i.e. the peer address) and `User-Agent` header are
    /// captured only if enabled.
    pub fn new_session(&self, request: &Parts, key: &str) -> Session {
        let now = Utc::now();

        let ip = if self.config.with_ip {
            request
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip())
        } else {
            None
        };

        let user_agent = if self.config.with_agent {
            request
                .headers
                .get(USER_AGENT)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned)
        } else {
            None
        };

        Session {
            id: self.config.gen_id.generate(),
            user_key: key.to_string(),
            created_at: now,
            expires_at: self.config.expires_in.map(|d| now + d),
            ip,
            user_agent,
            current: false,
        }
    }

    /// Starts a new session for `key` and sets its cookie on `response`.
    ///
    /// Persistent sessions (a lifetime is configured) are written to the
    /// store first. Without a lifetime, nothing is stored and only the
    /// browser-session cookie is issued; such a session can never pass the
    /// authentication middleware on a later request.
    ///
    /// # Errors
    /// - [`SessionError::Store`] — the store refused the session; no cookie
    ///   is set.
    /// - [`SessionError::Cookie`] — the cookie could not be encoded; nothing
    ///   is stored.
    pub async fn init(
        &self,
        request: &Parts,
        response: &mut HeaderMap,
        key: &str,
    ) -> Result<Session, SessionError> {
        let session = self.new_session(request, key);

        // Encode first so a bad cookie config can't leave an orphan row.
        let cookie = self.config.cookie.header(&session.id, session.expires_at)?;

        if session.is_persistent() {
            self.store.create(&session).await?;
        }

        response.append(SET_COOKIE, cookie);

        tracing::info!(
            user_key = %key,
            session = short_id(&session.id),
            persistent = session.is_persistent(),
            "session created"
        );
        Ok(session)
    }

    /// Revokes the session bound to `ctx` and clears the client cookie.
    ///
    /// With no session bound this is a successful no-op and the store is
    /// not touched.
    ///
    /// # Errors
    /// Returns the store's error if the delete fails; the cookie is then
    /// left alone.
    pub async fn revoke(
        &self,
        ctx: &Extensions,
        response: &mut HeaderMap,
    ) -> Result<(), SessionError> {
        let Some(session) = context::lookup(ctx) else {
            return Ok(());
        };

        // Built before the delete so an encoding failure leaves the store alone.
        let cookie = self.config.cookie.deletion_header()?;
        self.store.delete_by_id(&session.id).await?;
        response.append(SET_COOKIE, cookie);

        tracing::info!(
            user_key = %session.user_key,
            session = short_id(&session.id),
            "session revoked"
        );
        Ok(())
    }

    /// Revokes every session of `key` except the one bound to `ctx`.
    ///
    /// With no session bound there is nothing to keep, so every session of
    /// `key` is revoked. The cookie is not touched.
    pub async fn revoke_other(
        &self,
        ctx: &Extensions,
        key: &str,
    ) -> Result<(), SessionError> {
        let exclude: Vec<&str> = context::lookup(ctx)
            .map(|s| s.id.as_str())
            .into_iter()
            .collect();

        self.store.delete_by_user_key(key, &exclude).await?;

        tracing::info!(user_key = %key, kept = exclude.len(), "other sessions revoked");
        Ok(())
    }

    /// Revokes every session of `key`, the caller's own included, and
    /// clears the client cookie.
    pub async fn revoke_all(
        &self,
        response: &mut HeaderMap,
        key: &str,
    ) -> Result<(), SessionError> {
        let cookie = self.config.cookie.deletion_header()?;
        self.store.delete_by_user_key(key, &[]).await?;
        response.append(SET_COOKIE, cookie);

        tracing::info!(user_key = %key, "all sessions revoked");
        Ok(())
    }

    /// Lists every session of `key`.
    ///
    /// Returns `Ok(None)` when there are none. The entry whose ID matches
    /// the session bound to `ctx` has `current == true`; every other entry
    /// has `current == false`.
    pub async fn fetch_all(
        &self,
        ctx: &Extensions,
        key: &str,
    ) -> Result<Option<Vec<Session>>, SessionError> {
        let mut sessions = self.store.fetch_by_user_key(key).await?;
        if sessions.is_empty() {
            return Ok(None);
        }

        let current = context::lookup(ctx).map(|s| s.id.as_str());
        for session in &mut sessions {
            session.current = current == Some(session.id.as_str());
        }
        Ok(Some(sessions))
    }
}

/// First few characters of a session ID, enough to correlate log lines
/// without leaking a usable token.
pub(crate) fn short_id(id: &str) -> &str {
    id.char_indices().nth(6).map_or(id, |(i, _)| &id[..i])
}

// =========================================================================
// Tests
// =========================================================================
