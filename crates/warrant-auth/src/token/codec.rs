//! Canonical token serialization.
//!
//! A token is serialized as a compact JSON array with exactly six elements,
//! in a fixed order:
//!
//! ```text
//! [id, name, contents, validity, timestamp, permissions]
//! ```
//!
//! Object keys inside `contents` are emitted in sorted order, so the same
//! logical token always produces the same bytes. The signature is computed
//! over these bytes.

use serde::{Deserialize, Serialize};

use crate::AuthResult;
use crate::error::AuthError;
use crate::token::claims::{Contents, Token};

#[derive(Serialize)]
struct WireRef<'a>(&'a str, &'a str, &'a Contents, i64, i64, &'a [String]);

#[derive(Deserialize)]
struct Wire(String, String, Contents, i64, i64, Vec<String>);

/// Serializes a token into its canonical byte form.
#[must_use]
pub fn encode(token: &Token) -> Vec<u8> {
    let wire = WireRef(
        &token.id,
        &token.name,
        &token.contents,
        token.validity,
        token.timestamp,
        &token.permissions,
    );
    // String keys and JSON values only, serialization cannot fail.
    serde_json::to_vec(&wire).expect("token serialization is infallible")
}

/// Reconstructs a token from its canonical byte form.
///
/// # Errors
///
/// Returns [`AuthError::Decoding`] if the buffer is not a six-element array
/// with the expected element types.
pub fn decode(buffer: &[u8]) -> AuthResult<Token> {
    let Wire(id, name, contents, validity, timestamp, permissions) =
        serde_json::from_slice(buffer)
            .map_err(|e| AuthError::decoding(format!("Malformed token payload: {e}")))?;

    Ok(Token {
        id,
        name,
        contents,
        validity,
        timestamp,
        permissions,
    })
}
