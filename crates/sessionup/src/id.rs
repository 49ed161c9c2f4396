//! Session ID generation.

use rand::Rng;
use rand::distr::Alphanumeric;

/// Length of IDs produced by [`RandomId::default`].
pub const DEFAULT_ID_LEN: usize = 30;

/// Produces a fresh, unguessable session ID.
///
/// Any `Fn() -> String` closure works, which is handy in tests:
///
/// ```rust
/// use sessionup::GenerateId;
///
/// let fixed = || "always-the-same".to_string();
/// assert_eq!(fixed.generate(), "always-the-same");
/// ```
pub trait GenerateId: Send + Sync + 'static {
    /// Returns a new session ID.
    fn generate(&self) -> String;
}

impl<F> GenerateId for F
where
    F: Fn() -> String + Send + Sync + 'static,
{
    fn generate(&self) -> String {
        self()
    }
}

/// Random alphanumeric IDs from the thread-local CSPRNG.
///
/// 30 characters from a 62-symbol alphabet is ~178 bits of entropy.
#[derive(Debug, Clone, Copy)]
pub struct RandomId {
    len: usize,
}

impl RandomId {
    /// Creates a generator producing IDs of `len` characters.
    pub fn new(len: usize) -> Self {
        Self { len }
    }
}

impl Default for RandomId {
    fn default() -> Self {
        Self::new(DEFAULT_ID_LEN)
    }
}

impl GenerateId for RandomId {
    fn generate(&self) -> String {
        rand::rng()
            .sample_iter(Alphanumeric)
            .take(self.len)
            .map(char::from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_random_id_default_len_and_alphabet() {
        let id = RandomId::default().generate();
        assert_eq!(id.len(), DEFAULT_ID_LEN);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_random_id_custom_len() {
        assert_eq!(RandomId::new(12).generate().len(), 12);
    }

    #[test]
    fn test_random_id_no_repeats_in_sample() {
        let generator = RandomId::default();
        let ids: HashSet<String> =
            (0..1000).map(|_| generator.generate()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_closure_is_generator() {
        let generator = || "fixed".to_string();
        assert_eq!(GenerateId::generate(&generator), "fixed");
    }
}
