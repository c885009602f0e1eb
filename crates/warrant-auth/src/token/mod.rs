//! Token issuance, validation and revocation.
//!
//! This module provides:
//!
//! - The [`Token`] value type and [`TokenRequest`] builder
//! - Canonical serialization ([`codec`])
//! - HMAC signing ([`signer`])
//! - The [`TokenAuthority`] tying them to a revocation store

pub mod authority;
pub mod claims;
pub mod codec;
pub mod signer;

pub use authority::{IssuedToken, RevocationTarget, TokenAuthority, TokenAuthorityBuilder};
pub use claims::{Contents, DEFAULT_VALIDITY, Token, TokenRequest};
pub use signer::{DigestAlgorithm, Signer};
