//! Credential resolution and verification.

pub mod hasher;
pub mod store;

pub use hasher::SecretHasher;
pub use store::{AllotmentSelector, CredentialStore};
