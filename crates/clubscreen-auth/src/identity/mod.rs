//! Short-lived identity tokens for the "reuse my existing login" path.

pub mod claims;
pub mod codec;

pub use claims::IdentityClaims;
pub use codec::IdentityCodec;
