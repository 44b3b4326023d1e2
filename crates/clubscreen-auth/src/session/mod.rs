//! Session lifecycle services built on the lease registry.

pub mod admission;
pub mod heartbeat;
pub mod playback;
pub mod reaper;

pub use admission::{AdmissionGrant, SessionAdmission};
pub use heartbeat::HeartbeatService;
pub use playback::{PlaybackAuthorization, PlaybackGate};
pub use reaper::LeaseReaper;
