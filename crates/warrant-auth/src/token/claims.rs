//! Token value type and the request used to issue one.

use std::time::Duration;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Caller-defined token payload.
pub type Contents = Map<String, Value>;

/// Number of random bytes in a token identifier (48 bits).
pub const ID_BYTES: usize = 6;

/// Default token lifetime: one year.
pub const DEFAULT_VALIDITY: Duration = Duration::from_secs(60 * 60 * 24 * 365);

/// An issued token.
///
/// Tokens are immutable once issued. Their status (valid, expired, revoked)
/// is never stored on the token itself; it is recomputed on every
/// validation from the clock and the revocation store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Random identifier, used as the revocation key.
    pub id: String,

    /// Human-readable subject label.
    pub name: String,

    /// Arbitrary JSON payload.
    pub contents: Contents,

    /// Expiry (Unix timestamp).
    pub validity: i64,

    /// Issued at (Unix timestamp).
    pub timestamp: i64,

    /// Granted permissions.
    pub permissions: Vec<String>,
}

impl Token {
    /// Generates a fresh random identifier.
    ///
    /// Returns 48 bits from the OS-seeded thread RNG, hex-encoded
    /// (12 characters).
    #[must_use]
    pub fn generate_id() -> String {
        let mut bytes = [0u8; ID_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        hex::encode(bytes)
    }

    /// Returns `true` if the token grants `permission`.
    #[must_use]
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }

    /// Returns `true` if the token is expired at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.validity < now
    }

    /// Seconds remaining until expiry at `now`, zero once expired.
    #[must_use]
    pub fn expires_in(&self, now: i64) -> u64 {
        u64::try_from(self.validity.saturating_sub(now)).unwrap_or(0)
    }
}

/// Parameters for issuing a token.
///
/// Everything but the name is optional: contents default to an empty map,
/// permissions to none and validity to the authority's default lifetime.
///
/// ```ignore
/// let request = TokenRequest::new("backup-agent")
///     .claim("host", "db-1")
///     .permission("read")
///     .validity(Duration::from_secs(3600));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TokenRequest {
    pub(crate) name: String,
    pub(crate) contents: Contents,
    pub(crate) permissions: Vec<String>,
    pub(crate) validity: Option<Duration>,
}

impl TokenRequest {
    /// Creates a request for a token with the given subject name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Replaces the token contents.
    #[must_use]
    pub fn contents(mut self, contents: Contents) -> Self {
        self.contents = contents;
        self
    }

    /// Adds a single entry to the token contents.
    #[must_use]
    pub fn claim(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.contents.insert(key.into(), value.into());
        self
    }

    /// Appends a permission.
    #[must_use]
    pub fn permission(mut self, permission: impl Into<String>) -> Self {
        self.permissions.push(permission.into());
        self
    }

    /// Appends several permissions, preserving their order.
    #[must_use]
    pub fn permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions
            .extend(permissions.into_iter().map(Into::into));
        self
    }

    /// Overrides the authority's default lifetime.
    ///
    /// Lifetimes are rounded up to whole seconds, with a minimum of one.
    #[must_use]
    pub fn validity(mut self, validity: Duration) -> Self {
        self.validity = Some(validity);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_token() -> Token {
        Token {
            id: "0a1b2c3d4e5f".to_string(),
            name: "Hello World".to_string(),
            contents: Contents::new(),
            validity: 2_000,
            timestamp: 1_000,
            permissions: vec!["read".to_string(), "list".to_string()],
        }
    }

    #[test]
    fn test_generate_id() {
        let id = Token::generate_id();
        assert_eq!(id.len(), ID_BYTES * 2);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(id, Token::generate_id());
    }

    #[test]
    fn test_has_permission() {
        let token = sample_token();
        assert!(token.has_permission("read"));
        assert!(token.has_permission("list"));
        assert!(!token.has_permission("write"));
    }

    #[test]
    fn test_expiry_helpers() {
        let token = sample_token();
        assert!(!token.is_expired_at(2_000));
        assert!(token.is_expired_at(2_001));
        assert_eq!(token.expires_in(1_500), 500);
        assert_eq!(token.expires_in(3_000), 0);
    }

    #[test]
    fn test_request_builder() {
        let request = TokenRequest::new("agent")
            .claim("host", "db-1")
            .claim("shard", 3)
            .permission("read")
            .permissions(["write", "admin"])
            .validity(Duration::from_secs(60));

        assert_eq!(request.name, "agent");
        assert_eq!(request.contents.get("host"), Some(&json!("db-1")));
        assert_eq!(request.contents.get("shard"), Some(&json!(3)));
        assert_eq!(request.permissions, vec!["read", "write", "admin"]);
        assert_eq!(request.validity, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_request_defaults() {
        let request = TokenRequest::new("agent");
        assert!(request.contents.is_empty());
        assert!(request.permissions.is_empty());
        assert!(request.validity.is_none());
        assert_eq!(DEFAULT_VALIDITY.as_secs(), 31_536_000);
    }
}
