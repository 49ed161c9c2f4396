//! Error types for the storage layer.

/// Errors a [`Store`](crate::Store) can report.
///
/// The session manager never inspects these beyond displaying them: they
/// are passed unchanged to whoever called the failing operation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A session with this ID already exists.
    ///
    /// IDs come from a high-entropy generator, so seeing this usually means
    /// a misconfigured ID generator rather than bad luck.
    #[error("session {0} already exists")]
    Duplicate(String),

    /// The backing service failed (connection lost, query error, ...).
    #[error("store backend failure: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Wraps any backend error as [`StoreError::Backend`].
    pub fn backend(
        err: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Backend(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_from_string_keeps_message() {
        let err = StoreError::backend("connection refused");
        assert!(matches!(err, StoreError::Backend(_)));
        assert_eq!(
            err.to_string(),
            "store backend failure: connection refused"
        );
    }

    #[test]
    fn test_duplicate_display() {
        let err = StoreError::Duplicate("abc".into());
        assert_eq!(err.to_string(), "session abc already exists");
    }
}
