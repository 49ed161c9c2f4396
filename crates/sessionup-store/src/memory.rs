//! An in-process [`Store`] backed by hash maps.
//!
//! Good for tests, demos, and single-instance deployments that can afford
//! to lose every session on restart. It is the reference for how a store is
//! expected to behave:
//! - duplicate IDs are refused at insert
//! - expired sessions are invisible to reads
//! - deletes are idempotent
//!
//! Expired rows are not removed on their own; call
//! [`MemoryStore::prune_expired`] periodically (e.g. from a `tokio` interval
//! task) to reclaim memory.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::{Session, Store, StoreError};

/// Both maps are kept in sync: every ID in `by_user` exists in `sessions`
/// and every session is indexed under its `user_key`.
#[derive(Debug, Default)]
struct Inner {
    /// All sessions, keyed by session ID.
    sessions: HashMap<String, Session>,

    /// An index from user key to the IDs of that user's sessions.
    ///
    /// Bulk operations by user key look here instead of scanning every
    /// session.
    by_user: HashMap<String, HashSet<String>>,
}

impl Inner {
    fn remove(&mut self, id: &str) -> Option<Session> {
        let session = self.sessions.remove(id)?;
        if let Some(ids) = self.by_user.get_mut(&session.user_key) {
            ids.remove(id);
            if ids.is_empty() {
                self.by_user.remove(&session.user_key);
            }
        }
        Some(session)
    }
}

/// Thread-safe in-memory session store.
///
/// Reads take a shared lock, writes an exclusive one. Share it between
/// managers by wrapping it in an `Arc` on your side, or just hand it to a
/// single manager (which already keeps it behind an `Arc`).
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes every session whose expiry is at or before `now`.
    ///
    /// Returns the IDs that were removed.
    pub async fn prune_expired_at(&self, now: DateTime<Utc>) -> Vec<String> {
        let mut inner = self.inner.write().await;

        let expired: Vec<String> = inner
            .sessions
            .values()
            .filter(|s| s.is_expired_at(now))
            .map(|s| s.id.clone())
            .collect();

        for id in &expired {
            inner.remove(id);
        }

        if !expired.is_empty() {
            tracing::debug!(count = expired.len(), "pruned expired sessions");
        }
        expired
    }

    /// Removes every session that has expired by now.
    pub async fn prune_expired(&self) -> Vec<String> {
        self.prune_expired_at(Utc::now()).await
    }

    /// Returns the number of stored sessions, expired ones included.
    pub async fn len(&self) -> usize {
        self.inner.read().await.sessions.len()
    }

    /// Returns `true` if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.sessions.is_empty()
    }
}

impl Store for MemoryStore {
    async fn create(&self, session: &Session) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;

        if inner.sessions.contains_key(&session.id) {
            return Err(StoreError::Duplicate(session.id.clone()));
        }

        let mut session = session.clone();
        session.current = false;

        inner
            .by_user
            .entry(session.user_key.clone())
            .or_default()
            .insert(session.id.clone());
        inner.sessions.insert(session.id.clone(), session);
        Ok(())
    }

    async fn fetch_by_id(
        &self,
        id: &str,
    ) -> Result<Option<Session>, StoreError> {
        let now = Utc::now();
        let inner = self.inner.read().await;
        Ok(inner
            .sessions
            .get(id)
            .filter(|s| !s.is_expired_at(now))
            .cloned())
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        self.inner.write().await.remove(id);
        Ok(())
    }

    async fn fetch_by_user_key(
        &self,
        key: &str,
    ) -> Result<Vec<Session>, StoreError> {
        let now = Utc::now();
        let inner = self.inner.read().await;

        let Some(ids) = inner.by_user.get(key) else {
            return Ok(Vec::new());
        };

        let mut sessions: Vec<Session> = ids
            .iter()
            .filter_map(|id| inner.sessions.get(id))
            .filter(|s| !s.is_expired_at(now))
            .cloned()
            .collect();
        // Oldest first; hash set order is arbitrary.
        sessions.sort_by(|a, b| {
            a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id))
        });
        Ok(sessions)
    }

    async fn delete_by_user_key(
        &self,
        key: &str,
        exclude: &[&str],
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;

        let Some(ids) = inner.by_user.get(key) else {
            return Ok(());
        };

        let doomed: Vec<String> = ids
            .iter()
            .filter(|id| !exclude.contains(&id.as_str()))
            .cloned()
            .collect();

        for id in &doomed {
            inner.remove(id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;

    fn session(id: &str, key: &str) -> Session {
        Session {
            id: id.into(),
            user_key: key.into(),
            created_at: Utc::now(),
            expires_at: Some(Utc::now() + TimeDelta::hours(1)),
            ip: None,
            user_agent: None,
            current: false,
        }
    }

    // =====================================================================
    // create() / fetch_by_id()
    // =====================================================================

    #[tokio::test]
    async fn test_create_then_fetch_by_id_returns_session() {
        let store = MemoryStore::new();
        store.create(&session("a", "alice")).await.unwrap();

        let found = store.fetch_by_id("a").await.unwrap();
        assert_eq!(found.map(|s| s.user_key), Some("alice".to_string()));
    }

    #[tokio::test]
    async fn test_create_duplicate_id_returns_duplicate() {
        let store = MemoryStore::new();
        store.create(&session("a", "alice")).await.unwrap();

        let result = store.create(&session("a", "bob")).await;
        assert!(matches!(result, Err(StoreError::Duplicate(id)) if id == "a"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_create_clears_current_flag() {
        let store = MemoryStore::new();
        let mut s = session("a", "alice");
        s.current = true;
        store.create(&s).await.unwrap();

        let found = store.fetch_by_id("a").await.unwrap().unwrap();
        assert!(!found.current);
    }

    #[tokio::test]
    async fn test_fetch_by_id_unknown_returns_none() {
        let store = MemoryStore::new();
        assert!(store.fetch_by_id("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_fetch_by_id_expired_returns_none() {
        let store = MemoryStore::new();
        let mut s = session("a", "alice");
        s.expires_at = Some(Utc::now() - TimeDelta::seconds(1));
        store.create(&s).await.unwrap();

        assert!(store.fetch_by_id("a").await.unwrap().is_none());
    }

    // =====================================================================
    // delete_by_id()
    // =====================================================================

    #[tokio::test]
    async fn test_delete_by_id_removes_from_both_maps() {
        let store = MemoryStore::new();
        store.create(&session("a", "alice")).await.unwrap();

        store.delete_by_id("a").await.unwrap();

        assert!(store.is_empty().await);
        assert!(store.fetch_by_user_key("alice").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_by_id_unknown_is_ok() {
        let store = MemoryStore::new();
        assert!(store.delete_by_id("nope").await.is_ok());
    }

    // =====================================================================
    // fetch_by_user_key() / delete_by_user_key()
    // =====================================================================

    #[tokio::test]
    async fn test_fetch_by_user_key_returns_only_that_user() {
        let store = MemoryStore::new();
        store.create(&session("a1", "alice")).await.unwrap();
        store.create(&session("a2", "alice")).await.unwrap();
        store.create(&session("b1", "bob")).await.unwrap();

        let alice = store.fetch_by_user_key("alice").await.unwrap();
        let mut ids: Vec<_> = alice.iter().map(|s| s.id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, ["a1", "a2"]);
    }

    #[tokio::test]
    async fn test_fetch_by_user_key_unknown_returns_empty() {
        let store = MemoryStore::new();
        assert!(store.fetch_by_user_key("ghost").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_by_user_key_respects_exclusions() {
        let store = MemoryStore::new();
        store.create(&session("a1", "alice")).await.unwrap();
        store.create(&session("a2", "alice")).await.unwrap();
        store.create(&session("a3", "alice")).await.unwrap();
        store.create(&session("b1", "bob")).await.unwrap();

        store.delete_by_user_key("alice", &["a2"]).await.unwrap();

        let alice = store.fetch_by_user_key("alice").await.unwrap();
        assert_eq!(alice.len(), 1);
        assert_eq!(alice[0].id, "a2");
        // Other users are untouched.
        assert!(store.fetch_by_id("b1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_by_user_key_without_exclusions_removes_all() {
        let store = MemoryStore::new();
        store.create(&session("a1", "alice")).await.unwrap();
        store.create(&session("a2", "alice")).await.unwrap();

        store.delete_by_user_key("alice", &[]).await.unwrap();

        assert!(store.is_empty().await);
    }

    // =====================================================================
    // prune_expired_at()
    // =====================================================================

    #[tokio::test]
    async fn test_prune_expired_at_removes_only_expired() {
        let store = MemoryStore::new();
        let now = Utc::now();

        let mut old = session("old", "alice");
        old.expires_at = Some(now - TimeDelta::minutes(5));
        store.create(&old).await.unwrap();
        store.create(&session("fresh", "alice")).await.unwrap();

        let removed = store.prune_expired_at(now).await;

        assert_eq!(removed, vec!["old".to_string()]);
        assert_eq!(store.len().await, 1);
        assert!(store.fetch_by_id("fresh").await.unwrap().is_some());
    }
}
