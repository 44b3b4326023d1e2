//! Opaque session bearer tokens.

pub mod issuer;

pub use issuer::{SessionToken, SessionTokenIssuer};
