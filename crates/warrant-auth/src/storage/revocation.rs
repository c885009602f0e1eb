//! Revocation store trait and in-memory implementation.
//!
//! The store maps a revocation key to the time it was revoked. A key is
//! either a token identifier or a raw token string; the store treats both
//! as opaque.
//!
//! # Guarantees
//!
//! Implementations must ensure:
//!
//! - A `put` is atomic with respect to concurrent reads: a reader observes
//!   the revocation fully or not at all
//! - Repeated `put` of the same key is last-write-wins
//! - Nothing is implied about ordering between different keys
//!
//! Revocations never expire on their own. A store that cannot answer a
//! lookup must return an error instead of reporting the key as not revoked.

use std::sync::Arc;

use dashmap::DashMap;

use crate::AuthResult;

/// Storage trait for revoked token keys.
///
/// Several authorities sharing the same secret may share one store, so
/// implementations must be safe to use from many threads at once.
///
/// # Example Implementation
///
/// ```ignore
/// use warrant_auth::storage::RevocationStore;
/// use warrant_auth::{AuthError, AuthResult};
///
/// struct RedisRevocationStore {
///     pool: r2d2::Pool<redis::Client>,
/// }
///
/// impl RevocationStore for RedisRevocationStore {
///     fn revoked_at(&self, key: &str) -> AuthResult<Option<i64>> {
///         let mut conn = self.pool.get().map_err(|e| AuthError::storage(e.to_string()))?;
///         conn.hget("revoked", key).map_err(|e| AuthError::storage(e.to_string()))
///     }
///     // ...
/// }
/// ```
pub trait RevocationStore: Send + Sync {
    /// Returns when `key` was revoked, or `None` if it never was.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn revoked_at(&self, key: &str) -> AuthResult<Option<i64>>;

    /// Records `key` as revoked at `timestamp`, replacing any earlier record.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn put(&self, key: &str, timestamp: i64) -> AuthResult<()>;

    /// Returns `true` if `key` has been revoked.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn contains(&self, key: &str) -> AuthResult<bool> {
        Ok(self.revoked_at(key)?.is_some())
    }
}

impl<S: RevocationStore + ?Sized> RevocationStore for Arc<S> {
    fn revoked_at(&self, key: &str) -> AuthResult<Option<i64>> {
        (**self).revoked_at(key)
    }

    fn put(&self, key: &str, timestamp: i64) -> AuthResult<()> {
        (**self).put(key, timestamp)
    }
}

/// Thread-safe in-memory revocation store.
///
/// Entries live until [`clear`](Self::clear) is called or the store is
/// dropped.
#[derive(Debug, Default)]
pub struct InMemoryRevocationStore {
    revoked: DashMap<String, i64>,
}

impl InMemoryRevocationStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of revoked keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.revoked.len()
    }

    /// Returns `true` if nothing has been revoked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.revoked.is_empty()
    }

    /// Forgets every revocation.
    pub fn clear(&self) {
        self.revoked.clear();
    }
}

impl RevocationStore for InMemoryRevocationStore {
    fn revoked_at(&self, key: &str) -> AuthResult<Option<i64>> {
        Ok(self.revoked.get(key).map(|entry| *entry.value()))
    }

    fn put(&self, key: &str, timestamp: i64) -> AuthResult<()> {
        self.revoked.insert(key.to_string(), timestamp);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_unknown_key_not_revoked() {
        let store = InMemoryRevocationStore::new();
        assert_eq!(store.revoked_at("missing").unwrap(), None);
        assert!(!store.contains("missing").unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn test_put_and_lookup() {
        let store = InMemoryRevocationStore::new();
        store.put("abc", 100).unwrap();

        assert_eq!(store.revoked_at("abc").unwrap(), Some(100));
        assert!(store.contains("abc").unwrap());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_last_write_wins() {
        let store = InMemoryRevocationStore::new();
        store.put("abc", 100).unwrap();
        store.put("abc", 250).unwrap();

        assert_eq!(store.revoked_at("abc").unwrap(), Some(250));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_clear() {
        let store = InMemoryRevocationStore::new();
        store.put("a", 1).unwrap();
        store.put("b", 2).unwrap();
        store.clear();
        assert!(store.is_empty());
        assert!(!store.contains("a").unwrap());
    }

    #[test]
    fn test_shared_across_threads() {
        let store = Arc::new(InMemoryRevocationStore::new());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for j in 0..100 {
                        store.put(&format!("key-{i}-{j}"), i64::from(j)).unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.len(), 800);
        assert_eq!(store.revoked_at("key-7-99").unwrap(), Some(99));
    }

    #[test]
    fn test_arc_delegates() {
        let store: Arc<dyn RevocationStore> = Arc::new(InMemoryRevocationStore::new());
        let shared = Arc::clone(&store);
        shared.put("abc", 5).unwrap();
        assert!(store.contains("abc").unwrap());
    }
}
