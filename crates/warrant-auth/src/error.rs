//! Token authority error types.
//!
//! Every rejection produced while validating a token maps to exactly one
//! variant of [`AuthError`]. Callers treat all of them as "not authorized";
//! only [`AuthError::Expired`] and [`AuthError::Revoked`] carry enough detail
//! to justify issuing a fresh token.

use std::fmt;

/// Errors that can occur while issuing, validating or revoking tokens.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The token is not valid base64 or not a well-formed serialized token.
    #[error("Token decoding failed: {message}")]
    Decoding {
        /// Description of why decoding failed.
        message: String,
    },

    /// The token signature does not match its payload.
    #[error("Token signature is invalid")]
    Signature,

    /// The token claims to have been issued after the validation time.
    #[error("Token timestamp is invalid: issued at {issued_at}, now {now}")]
    Clock {
        /// Issuance timestamp carried by the token.
        issued_at: i64,
        /// Validation time.
        now: i64,
    },

    /// The token validity has passed.
    #[error("Token validity is expired: expired {elapsed}s ago")]
    Expired {
        /// Absolute expiry timestamp carried by the token.
        expired_at: i64,
        /// Seconds elapsed since expiry.
        elapsed: u64,
    },

    /// A required permission is absent from the token.
    #[error("Token is missing the '{permission}' permission")]
    Permission {
        /// The missing permission.
        permission: String,
    },

    /// The token or its identifier was found in the revocation store.
    #[error("Token was revoked {elapsed}s ago")]
    Revoked {
        /// The key the revocation was recorded under.
        key: String,
        /// Seconds elapsed since revocation.
        elapsed: u64,
    },

    /// The revocation store could not be read or written.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage error.
        message: String,
    },

    /// The authority configuration is invalid.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
    },
}

impl AuthError {
    /// Creates a new `Decoding` error.
    #[must_use]
    pub fn decoding(message: impl Into<String>) -> Self {
        Self::Decoding {
            message: message.into(),
        }
    }

    /// Creates a new `Permission` error.
    #[must_use]
    pub fn permission(permission: impl Into<String>) -> Self {
        Self::Permission {
            permission: permission.into(),
        }
    }

    /// Creates a new `Storage` error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates a new `Configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates an `Expired` error for a token that expired at `expired_at`.
    #[must_use]
    pub fn expired(expired_at: i64, now: i64) -> Self {
        Self::Expired {
            expired_at,
            elapsed: elapsed_seconds(expired_at, now),
        }
    }

    /// Creates a `Revoked` error for a key revoked at `revoked_at`.
    #[must_use]
    pub fn revoked(key: impl Into<String>, revoked_at: i64, now: i64) -> Self {
        Self::Revoked {
            key: key.into(),
            elapsed: elapsed_seconds(revoked_at, now),
        }
    }

    /// Returns `true` if the error is a rejection of the presented token
    /// rather than a failure of the authority itself.
    #[must_use]
    pub fn is_token_error(&self) -> bool {
        matches!(
            self,
            Self::Decoding { .. }
                | Self::Signature
                | Self::Clock { .. }
                | Self::Expired { .. }
                | Self::Permission { .. }
                | Self::Revoked { .. }
        )
    }

    /// Returns `true` if the holder may legitimately ask for a new token.
    #[must_use]
    pub fn is_reissuable(&self) -> bool {
        matches!(self, Self::Expired { .. } | Self::Revoked { .. })
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Decoding { .. } => ErrorCategory::Token,
            Self::Signature => ErrorCategory::Token,
            Self::Clock { .. } => ErrorCategory::Token,
            Self::Expired { .. } => ErrorCategory::Token,
            Self::Revoked { .. } => ErrorCategory::Token,
            Self::Permission { .. } => ErrorCategory::Authorization,
            Self::Storage { .. } => ErrorCategory::Infrastructure,
            Self::Configuration { .. } => ErrorCategory::Configuration,
        }
    }
}

fn elapsed_seconds(since: i64, now: i64) -> u64 {
    u64::try_from(now.saturating_sub(since)).unwrap_or(0)
}

/// Categories of authority errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The presented token is malformed, forged, out of its window or revoked.
    Token,
    /// The token is genuine but lacks a required permission.
    Authorization,
    /// The revocation store failed.
    Infrastructure,
    /// The authority was misconfigured.
    Configuration,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token => write!(f, "token"),
            Self::Authorization => write!(f, "authorization"),
            Self::Infrastructure => write!(f, "infrastructure"),
            Self::Configuration => write!(f, "configuration"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AuthError::decoding("invalid base64");
        assert_eq!(err.to_string(), "Token decoding failed: invalid base64");

        let err = AuthError::Signature;
        assert_eq!(err.to_string(), "Token signature is invalid");

        let err = AuthError::permission("write");
        assert_eq!(err.to_string(), "Token is missing the 'write' permission");

        let err = AuthError::revoked("abc", 100, 130);
        assert_eq!(err.to_string(), "Token was revoked 30s ago");
    }

    #[test]
    fn test_elapsed_never_negative() {
        match AuthError::expired(200, 100) {
            AuthError::Expired {
                expired_at,
                elapsed,
            } => {
                assert_eq!(expired_at, 200);
                assert_eq!(elapsed, 0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_error_predicates() {
        assert!(AuthError::Signature.is_token_error());
        assert!(!AuthError::Signature.is_reissuable());

        let err = AuthError::expired(10, 20);
        assert!(err.is_token_error());
        assert!(err.is_reissuable());

        let err = AuthError::revoked("id", 10, 20);
        assert!(err.is_reissuable());

        let err = AuthError::storage("connection refused");
        assert!(!err.is_token_error());
        assert!(!err.is_reissuable());
    }

    #[test]
    fn test_error_category() {
        assert_eq!(AuthError::Signature.category(), ErrorCategory::Token);
        assert_eq!(
            AuthError::permission("read").category(),
            ErrorCategory::Authorization
        );
        assert_eq!(
            AuthError::storage("down").category(),
            ErrorCategory::Infrastructure
        );
        assert_eq!(
            AuthError::configuration("bad").category(),
            ErrorCategory::Configuration
        );
    }

    #[test]
    fn test_error_category_display() {
        assert_eq!(ErrorCategory::Token.to_string(), "token");
        assert_eq!(ErrorCategory::Authorization.to_string(), "authorization");
        assert_eq!(ErrorCategory::Infrastructure.to_string(), "infrastructure");
    }
}
