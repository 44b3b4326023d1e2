//! Credential validation, session admission, and heartbeat-lease
//! management for clubscreen.
//!
//! The admission path enforces the one real invariant of the platform:
//! for every allotment, the number of *fresh* leases never exceeds the
//! allotment's capacity, no matter how many admission requests race.

pub mod credential;
pub mod directory;
pub mod identity;
pub mod lease;
pub mod session;
pub mod token;
