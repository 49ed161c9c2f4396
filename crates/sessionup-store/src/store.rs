//! The storage contract sessions are persisted through.
//!
//! sessionup doesn't persist anything itself. That's the job of a database,
//! a cache, or whatever else your application already runs. Instead it
//! defines the [`Store`] trait: five async operations keyed by session ID or
//! by user key. You implement the trait over your backend and hand it to
//! the session manager.
//!
//! There is no explicit cancellation parameter. Every operation runs inside
//! the request task that awaits it; dropping the future cancels the call,
//! and timeouts belong to the caller or to the implementation.

use std::future::Future;

use crate::{Session, StoreError};

/// Durable backend for sessions.
///
/// # Trait bounds
///
/// - `Send + Sync` → one store is shared by every in-flight request.
/// - `'static` → it lives as long as the manager that owns it.
///
/// Futures must be `Send` so the authentication middleware can run on a
/// multi-threaded runtime.
///
/// # Example
///
/// ```rust
/// use sessionup_store::{Session, Store, StoreError};
///
/// /// Knows no sessions and forgets everything it is told.
/// struct NullStore;
///
/// impl Store for NullStore {
///     async fn create(&self, _session: &Session) -> Result<(), StoreError> {
///         Ok(())
///     }
///
///     async fn fetch_by_id(
///         &self,
///         _id: &str,
///     ) -> Result<Option<Session>, StoreError> {
///         Ok(None)
///     }
///
///     async fn delete_by_id(&self, _id: &str) -> Result<(), StoreError> {
///         Ok(())
///     }
///
///     async fn fetch_by_user_key(
///         &self,
///         _key: &str,
///     ) -> Result<Vec<Session>, StoreError> {
///         Ok(Vec::new())
///     }
///
///     async fn delete_by_user_key(
///         &self,
///         _key: &str,
///         _exclude: &[&str],
///     ) -> Result<(), StoreError> {
///         Ok(())
///     }
/// }
/// ```
pub trait Store: Send + Sync + 'static {
    /// Inserts a new persistent session.
    ///
    /// Uniqueness of `session.id` is the implementation's call; returning
    /// [`StoreError::Duplicate`] is the conventional way to refuse.
    fn create(
        &self,
        session: &Session,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Resolves a session by its ID.
    ///
    /// `Ok(None)` means the call worked but no such session exists.
    fn fetch_by_id(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<Session>, StoreError>> + Send;

    /// Deletes a session by its ID. Deleting an unknown ID is not an error.
    fn delete_by_id(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Returns every session belonging to `key`.
    ///
    /// An empty `Vec` is the "no results" signal, not an error.
    fn fetch_by_user_key(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Vec<Session>, StoreError>> + Send;

    /// Deletes every session belonging to `key` except those whose ID is
    /// listed in `exclude`.
    fn delete_by_user_key(
        &self,
        key: &str,
        exclude: &[&str],
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}
