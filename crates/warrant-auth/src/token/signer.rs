//! HMAC token signing.
//!
//! The signer computes a fixed-length authentication tag over a serialized
//! token. The secret and digest are fixed for the lifetime of the signer.
//!
//! ## Supported Digests
//!
//! - **sha256**: HMAC-SHA-256, 32-byte tags (default)
//! - **sha384**: HMAC-SHA-384, 48-byte tags
//! - **sha512**: HMAC-SHA-512, 64-byte tags

use std::fmt;
use std::str::FromStr;

use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::{Sha256, Sha384, Sha512};
use zeroize::Zeroizing;

type HmacSha256 = Hmac<Sha256>;
type HmacSha384 = Hmac<Sha384>;
type HmacSha512 = Hmac<Sha512>;

/// Digest algorithm underlying the token MAC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    /// SHA-256.
    #[default]
    Sha256,
    /// SHA-384.
    Sha384,
    /// SHA-512.
    Sha512,
}

impl DigestAlgorithm {
    /// Returns the algorithm name as used in configuration.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
        }
    }

    /// Length in bytes of the tags produced with this digest.
    #[must_use]
    pub fn tag_len(&self) -> usize {
        match self {
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha256" => Ok(Self::Sha256),
            "sha384" => Ok(Self::Sha384),
            "sha512" => Ok(Self::Sha512),
            other => Err(format!(
                "Unknown digest algorithm: '{other}'. Must be sha256, sha384 or sha512"
            )),
        }
    }
}

/// Keyed MAC over serialized tokens.
#[derive(Clone)]
pub struct Signer {
    secret: Zeroizing<Vec<u8>>,
    algorithm: DigestAlgorithm,
}

impl Signer {
    /// Creates a signer from raw secret bytes.
    #[must_use]
    pub fn new(secret: impl Into<Vec<u8>>, algorithm: DigestAlgorithm) -> Self {
        Self {
            secret: Zeroizing::new(secret.into()),
            algorithm,
        }
    }

    /// The digest this signer was built with.
    #[must_use]
    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    /// Length in bytes of the tags this signer produces.
    #[must_use]
    pub fn tag_len(&self) -> usize {
        self.algorithm.tag_len()
    }

    /// Computes the tag for `buffer`.
    #[must_use]
    pub fn sign(&self, buffer: &[u8]) -> Vec<u8> {
        match self.algorithm {
            DigestAlgorithm::Sha256 => keyed::<HmacSha256>(&self.secret, buffer)
                .finalize()
                .into_bytes()
                .to_vec(),
            DigestAlgorithm::Sha384 => keyed::<HmacSha384>(&self.secret, buffer)
                .finalize()
                .into_bytes()
                .to_vec(),
            DigestAlgorithm::Sha512 => keyed::<HmacSha512>(&self.secret, buffer)
                .finalize()
                .into_bytes()
                .to_vec(),
        }
    }

    /// Checks `tag` against the tag for `buffer` in constant time.
    ///
    /// A tag of the wrong length never verifies.
    #[must_use]
    pub fn verify(&self, buffer: &[u8], tag: &[u8]) -> bool {
        match self.algorithm {
            DigestAlgorithm::Sha256 => keyed::<HmacSha256>(&self.secret, buffer)
                .verify_slice(tag)
                .is_ok(),
            DigestAlgorithm::Sha384 => keyed::<HmacSha384>(&self.secret, buffer)
                .verify_slice(tag)
                .is_ok(),
            DigestAlgorithm::Sha512 => keyed::<HmacSha512>(&self.secret, buffer)
                .verify_slice(tag)
                .is_ok(),
        }
    }
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer")
            .field("secret", &"[REDACTED]")
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

fn keyed<M: Mac + KeyInit>(secret: &[u8], buffer: &[u8]) -> M {
    let mut mac =
        <M as KeyInit>::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(buffer);
    mac
}
