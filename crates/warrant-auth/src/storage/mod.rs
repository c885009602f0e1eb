//! Storage traits for authority state.
//!
//! The only state the authority reads or writes is the revocation set.
//! Other backends implement [`RevocationStore`] in their own crates.

pub mod revocation;

pub use revocation::{InMemoryRevocationStore, RevocationStore};
