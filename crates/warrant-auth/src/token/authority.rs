//! Token authority: issue, validate and revoke signed tokens.
//!
//! The wire form of a token is
//!
//! ```text
//! base64( payload || HMAC(secret, payload) )
//! ```
//!
//! where `payload` is the canonical serialization produced by
//! [`codec::encode`]. There is no delimiter: the verifier splits the buffer
//! using the tag length of its digest.
//!
//! # Usage
//!
//! ```ignore
//! use warrant_auth::token::{TokenAuthority, TokenRequest};
//!
//! let authority = TokenAuthority::new(secret);
//!
//! let issued = authority.issue(TokenRequest::new("backup-agent").permission("read"));
//! let token = authority.validate(&issued.encoded, &["read"])?;
//!
//! authority.revoke(&token)?;
//! ```

use std::sync::Arc;
use std::time::Duration;

use base64::{Engine, engine::general_purpose::STANDARD};
use time::OffsetDateTime;

use crate::AuthResult;
use crate::config::AuthorityConfig;
use crate::error::AuthError;
use crate::storage::{InMemoryRevocationStore, RevocationStore};
use crate::token::claims::{DEFAULT_VALIDITY, Token, TokenRequest};
use crate::token::codec;
use crate::token::signer::{DigestAlgorithm, Signer};

/// A freshly issued token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Opaque string handed to the token holder.
    pub encoded: String,

    /// The token as it was issued.
    pub token: Token,
}

/// What to revoke.
///
/// A token is revoked by its identifier. A raw string is used as the
/// revocation key unchanged, so it may be either an identifier or a
/// complete token string.
#[derive(Debug, Clone, Copy)]
pub enum RevocationTarget<'a> {
    /// Revoke by the token's identifier.
    Token(&'a Token),
    /// Revoke an opaque key.
    Key(&'a str),
}

impl RevocationTarget<'_> {
    /// The key recorded in the revocation store.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Token(token) => &token.id,
            Self::Key(key) => key,
        }
    }
}

impl<'a> From<&'a Token> for RevocationTarget<'a> {
    fn from(token: &'a Token) -> Self {
        Self::Token(token)
    }
}

impl<'a> From<&'a IssuedToken> for RevocationTarget<'a> {
    fn from(issued: &'a IssuedToken) -> Self {
        Self::Token(&issued.token)
    }
}

impl<'a> From<&'a str> for RevocationTarget<'a> {
    fn from(key: &'a str) -> Self {
        Self::Key(key)
    }
}

impl<'a> From<&'a String> for RevocationTarget<'a> {
    fn from(key: &'a String) -> Self {
        Self::Key(key)
    }
}

/// Issues, validates and revokes tokens.
///
/// The authority owns its signer. The revocation store is shared: several
/// authorities using the same secret may hold the same store.
pub struct TokenAuthority {
    /// MAC over serialized tokens.
    signer: Signer,

    /// Revoked identifiers and raw token strings.
    store: Arc<dyn RevocationStore>,

    /// Lifetime of tokens issued without an explicit validity.
    default_validity: Duration,
}

impl std::fmt::Debug for TokenAuthority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenAuthority")
            .field("signer", &self.signer)
            .field("default_validity", &self.default_validity)
            .finish_non_exhaustive()
    }
}

/// Builder for [`TokenAuthority`].
pub struct TokenAuthorityBuilder {
    secret: Vec<u8>,
    digest: DigestAlgorithm,
    store: Arc<dyn RevocationStore>,
    default_validity: Duration,
}

impl TokenAuthorityBuilder {
    /// Sets the digest algorithm (default: SHA-256).
    #[must_use]
    pub fn digest(mut self, digest: DigestAlgorithm) -> Self {
        self.digest = digest;
        self
    }

    /// Sets the revocation store (default: an empty in-memory store).
    #[must_use]
    pub fn store(mut self, store: Arc<dyn RevocationStore>) -> Self {
        self.store = store;
        self
    }

    /// Sets the lifetime of tokens issued without an explicit validity
    /// (default: one year).
    #[must_use]
    pub fn default_validity(mut self, validity: Duration) -> Self {
        self.default_validity = validity;
        self
    }

    /// Builds the authority.
    #[must_use]
    pub fn build(self) -> TokenAuthority {
        TokenAuthority {
            signer: Signer::new(self.secret, self.digest),
            store: self.store,
            default_validity: self.default_validity,
        }
    }
}

impl TokenAuthority {
    /// Creates an authority with SHA-256, a one-year default validity and
    /// an empty in-memory revocation store.
    #[must_use]
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self::builder(secret).build()
    }

    /// Starts building an authority around `secret`.
    #[must_use]
    pub fn builder(secret: impl Into<Vec<u8>>) -> TokenAuthorityBuilder {
        TokenAuthorityBuilder {
            secret: secret.into(),
            digest: DigestAlgorithm::default(),
            store: Arc::new(InMemoryRevocationStore::new()),
            default_validity: DEFAULT_VALIDITY,
        }
    }

    /// Creates an authority from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Configuration`] if the secret is empty or the
    /// configuration does not validate.
    pub fn from_config(
        secret: impl Into<Vec<u8>>,
        config: &AuthorityConfig,
        store: Arc<dyn RevocationStore>,
    ) -> AuthResult<Self> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(AuthError::configuration("secret must not be empty"));
        }

        config
            .validate()
            .map_err(|e| AuthError::configuration(e.to_string()))?;
        let digest = config
            .digest_algorithm()
            .map_err(|e| AuthError::configuration(e.to_string()))?;

        Ok(Self::builder(secret)
            .digest(digest)
            .store(store)
            .default_validity(config.default_validity)
            .build())
    }

    /// The digest algorithm tokens are signed with.
    #[must_use]
    pub fn digest(&self) -> DigestAlgorithm {
        self.signer.algorithm()
    }

    /// The lifetime of tokens issued without an explicit validity.
    #[must_use]
    pub fn default_validity(&self) -> Duration {
        self.default_validity
    }

    /// The revocation store this authority consults.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn RevocationStore> {
        &self.store
    }

    /// Issues a token valid from now.
    #[must_use]
    pub fn issue(&self, request: TokenRequest) -> IssuedToken {
        self.issue_at(request, unix_now())
    }

    /// Issues a token as if the clock read `now`.
    #[must_use]
    pub fn issue_at(&self, request: TokenRequest, now: i64) -> IssuedToken {
        let lifetime = lifetime_secs(request.validity.unwrap_or(self.default_validity));

        let token = Token {
            id: Token::generate_id(),
            name: request.name,
            contents: request.contents,
            validity: now.saturating_add(lifetime),
            timestamp: now,
            permissions: request.permissions,
        };

        let mut buffer = codec::encode(&token);
        let tag = self.signer.sign(&buffer);
        buffer.extend_from_slice(&tag);

        tracing::debug!(
            id = %token.id,
            name = %token.name,
            permissions = token.permissions.len(),
            validity = token.validity,
            "Token issued"
        );

        IssuedToken {
            encoded: STANDARD.encode(buffer),
            token,
        }
    }

    /// Validates a token string against the current time.
    ///
    /// Every permission in `permissions` must be granted by the token.
    ///
    /// # Errors
    ///
    /// See [`validate_at`](Self::validate_at).
    pub fn validate(&self, encoded: &str, permissions: &[&str]) -> AuthResult<Token> {
        self.validate_at(encoded, permissions, unix_now())
    }

    /// Validates a token string as if the clock read `now`.
    ///
    /// Checks run in order and stop at the first failure:
    ///
    /// 1. The raw string is not revoked
    /// 2. The string is valid base64
    /// 3. The buffer is long enough to carry a signature
    /// 4. The signature matches the payload
    /// 5. The payload is a well-formed token
    /// 6. The token was not issued after `now`
    /// 7. The token has not expired
    /// 8. Every required permission is granted
    /// 9. The token identifier is not revoked
    ///
    /// # Errors
    ///
    /// - [`AuthError::Revoked`] if the string or the identifier is revoked
    /// - [`AuthError::Decoding`] if the string or payload is malformed
    /// - [`AuthError::Signature`] if the signature does not match
    /// - [`AuthError::Clock`] if the token was issued in the future
    /// - [`AuthError::Expired`] if the token has expired
    /// - [`AuthError::Permission`] naming the first missing permission
    /// - [`AuthError::Storage`] if the revocation store fails
    pub fn validate_at(&self, encoded: &str, permissions: &[&str], now: i64) -> AuthResult<Token> {
        // 1. Raw string revocation
        if let Some(revoked_at) = self.store.revoked_at(encoded)? {
            tracing::debug!("Token string revoked");
            return Err(AuthError::revoked(encoded, revoked_at, now));
        }

        // 2. Base64
        let buffer = STANDARD.decode(encoded).map_err(|e| {
            tracing::debug!(error = %e, "Failed to decode token");
            AuthError::decoding(format!("Token is not valid base64: {e}"))
        })?;

        // 3. Split payload and tag
        let tag_len = self.signer.tag_len();
        if buffer.len() < tag_len {
            tracing::debug!(len = buffer.len(), "Token shorter than signature");
            return Err(AuthError::decoding(format!(
                "Token is {} bytes, shorter than a {tag_len}-byte signature",
                buffer.len()
            )));
        }
        let (payload, tag) = buffer.split_at(buffer.len() - tag_len);

        // 4. Signature
        if !self.signer.verify(payload, tag) {
            tracing::debug!("Token signature mismatch");
            return Err(AuthError::Signature);
        }

        // 5. Payload
        let token = codec::decode(payload).inspect_err(|e| {
            tracing::debug!(error = %e, "Signed payload is not a token");
        })?;

        // 6. Issued in the future
        if token.timestamp > now {
            tracing::debug!(
                id = %token.id,
                issued_at = token.timestamp,
                now,
                "Token issued in the future"
            );
            return Err(AuthError::Clock {
                issued_at: token.timestamp,
                now,
            });
        }

        // 7. Expiry
        if token.is_expired_at(now) {
            tracing::debug!(id = %token.id, "Token expired");
            return Err(AuthError::expired(token.validity, now));
        }

        // 8. Permissions
        if let Some(missing) = permissions.iter().find(|p| !token.has_permission(p)) {
            tracing::debug!(id = %token.id, permission = %missing, "Token missing permission");
            return Err(AuthError::permission(*missing));
        }

        // 9. Identifier revocation
        if let Some(revoked_at) = self.store.revoked_at(&token.id)? {
            tracing::debug!(id = %token.id, "Token revoked");
            return Err(AuthError::revoked(token.id, revoked_at, now));
        }

        tracing::debug!(id = %token.id, name = %token.name, "Token validated successfully");
        Ok(token)
    }

    /// Revokes a token or an opaque key as of now.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Storage`] if the revocation store fails.
    pub fn revoke<'a>(&self, target: impl Into<RevocationTarget<'a>>) -> AuthResult<()> {
        self.revoke_at(target, unix_now())
    }

    /// Revokes a token or an opaque key as if the clock read `now`.
    ///
    /// Revoking the same key again replaces the recorded time.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Storage`] if the revocation store fails.
    pub fn revoke_at<'a>(&self, target: impl Into<RevocationTarget<'a>>, now: i64) -> AuthResult<()> {
        let target = target.into();
        self.store.put(target.key(), now)?;

        match target {
            RevocationTarget::Token(token) => {
                tracing::info!(id = %token.id, "Token revoked");
            }
            RevocationTarget::Key(key) => {
                tracing::info!(key_len = key.len(), "Revocation key recorded");
            }
        }
        Ok(())
    }
}

/// Whole seconds of `lifetime`, rounded up and never below one.
fn lifetime_secs(lifetime: Duration) -> i64 {
    let secs = lifetime
        .as_secs()
        .saturating_add(u64::from(lifetime.subsec_nanos() > 0));
    i64::try_from(secs.max(1)).unwrap_or(i64::MAX)
}

fn unix_now() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}
