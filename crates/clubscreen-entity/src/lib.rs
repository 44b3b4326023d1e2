//! Domain entities shared across the clubscreen crates.

pub mod allotment;
pub mod game;
pub mod lease;

pub use allotment::{Allotment, AllotmentCredential};
pub use game::PublicationState;
pub use lease::Lease;
