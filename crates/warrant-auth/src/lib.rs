//! # warrant-auth
//!
//! A self-contained token authority. It issues compact, tamper-evident,
//! time-bounded tokens and later validates them, including permission
//! checks and revocation.
//!
//! ## Overview
//!
//! A token is serialized canonically, signed with an HMAC over a
//! caller-supplied secret and handed out as a single base64 string.
//! Validation reverses the process and then checks the time window, the
//! required permissions and the revocation store.
//!
//! ## Modules
//!
//! - [`config`] - Authority configuration
//! - [`error`] - Error taxonomy
//! - [`storage`] - Revocation store trait and in-memory implementation
//! - [`token`] - Token type, codec, signer and authority

pub mod config;
pub mod error;
pub mod storage;
pub mod token;

pub use config::{AuthorityConfig, ConfigError};
pub use error::{AuthError, ErrorCategory};
pub use storage::{InMemoryRevocationStore, RevocationStore};
pub use token::{
    Contents, DigestAlgorithm, IssuedToken, RevocationTarget, Token, TokenAuthority,
    TokenAuthorityBuilder, TokenRequest,
};

/// Type alias for token authority results.
pub type AuthResult<T> = Result<T, AuthError>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use warrant_auth::prelude::*;
/// ```
pub mod prelude {
    pub use crate::AuthResult;
    pub use crate::config::{AuthorityConfig, ConfigError};
    pub use crate::error::{AuthError, ErrorCategory};
    pub use crate::storage::{InMemoryRevocationStore, RevocationStore};
    pub use crate::token::{
        Contents, DigestAlgorithm, IssuedToken, RevocationTarget, Token, TokenAuthority,
        TokenRequest,
    };
}
