//! The session record: what the server remembers about one login.
//!
//! A "session" is the store's row for an authenticated principal. It tracks:
//! - WHO is logged in (`user_key`, opaque to this crate)
//! - HOW the client proves it (`id`, the cookie value)
//! - WHEN it was created and when it stops being valid
//! - WHERE it came from (IP and User-Agent, when captured)

use std::net::IpAddr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// A single server-tracked login session.
///
/// Many sessions may share one `user_key` (one per device or browser).
/// The `id` is the only thing the client ever holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque, unguessable token. Doubles as the cookie value.
    pub id: String,

    /// Caller-defined identifier of the principal (user ID, tenant+user
    /// composite, ...). Never interpreted here.
    pub user_key: String,

    /// When the session was constructed.
    pub created_at: DateTime<Utc>,

    /// Absolute expiry instant.
    ///
    /// `None` means the session has no server-side lifetime: the cookie is
    /// a browser-session cookie and the record is never written to a store.
    pub expires_at: Option<DateTime<Utc>>,

    /// Client IP captured at creation, if capture was enabled.
    pub ip: Option<IpAddr>,

    /// Client `User-Agent` captured at creation, if capture was enabled.
    pub user_agent: Option<String>,

    /// Request-scoped marker for "this is the session making the request".
    ///
    /// Only meaningful on listings. It is serialized so APIs can show it,
    /// but never read back: anything deserialized starts with `false`.
    #[serde(default, skip_deserializing)]
    pub current: bool,
}

impl Session {
    /// Returns `true` if the session has a finite lifetime and therefore
    /// belongs in a store.
    pub fn is_persistent(&self) -> bool {
        self.expires_at.is_some()
    }

    /// Returns `true` if the session has a finite lifetime that ended at
    /// or before `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(exp) if exp <= now)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;

    fn session(expires_at: Option<DateTime<Utc>>) -> Session {
        Session {
            id: "abc".into(),
            user_key: "user-1".into(),
            created_at: Utc::now(),
            expires_at,
            ip: None,
            user_agent: None,
            current: false,
        }
    }

    #[test]
    fn test_is_persistent_without_expiry_returns_false() {
        assert!(!session(None).is_persistent());
        assert!(session(Some(Utc::now())).is_persistent());
    }

    #[test]
    fn test_is_expired_at_past_and_future() {
        let now = Utc::now();
        let past = session(Some(now - TimeDelta::minutes(1)));
        let future = session(Some(now + TimeDelta::minutes(1)));

        assert!(past.is_expired_at(now));
        assert!(!future.is_expired_at(now));
        // No expiry never expires server-side.
        assert!(!session(None).is_expired_at(now));
    }

    #[test]
    fn test_deserialize_ignores_current_flag() {
        let mut s = session(None);
        s.current = true;

        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains("\"current\":true"));

        let back: Session = serde_json::from_str(&json).unwrap();
        assert!(!back.current, "current must never be read back");
        assert_eq!(back.id, s.id);
    }
}
