//! Application state shared across all handlers.

use std::sync::Arc;

use clubscreen_auth::credential::CredentialStore;
use clubscreen_auth::identity::IdentityCodec;
use clubscreen_auth::session::{HeartbeatService, PlaybackGate, SessionAdmission};
use clubscreen_core::config::AppConfig;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. All fields are
/// `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Credential and access-code validation.
    pub credential_store: Arc<CredentialStore>,
    /// Identity token codec for the login-reuse path.
    pub identity: Arc<IdentityCodec>,
    /// Capacity-guarded session admission.
    pub admission: Arc<SessionAdmission>,
    /// Lease heartbeat handling.
    pub heartbeat: Arc<HeartbeatService>,
    /// Playback freshness checks for the video-delivery collaborator.
    pub playback: Arc<PlaybackGate>,
}
