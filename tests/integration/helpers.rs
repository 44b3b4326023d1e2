//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Utc;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use clubscreen_auth::credential::{CredentialStore, SecretHasher};
use clubscreen_auth::directory::{AllotmentDirectory, MemoryAllotmentDirectory};
use clubscreen_auth::identity::IdentityCodec;
use clubscreen_auth::lease::{LeaseRegistry, MemoryLeaseRegistry};
use clubscreen_auth::session::{HeartbeatService, PlaybackGate, SessionAdmission};
use clubscreen_auth::token::SessionTokenIssuer;
use clubscreen_core::config::auth::AuthConfig;
use clubscreen_core::config::lease::LeaseConfig;
use clubscreen_core::config::logging::LoggingConfig;
use clubscreen_core::config::server::{CorsConfig, ServerConfig};
use clubscreen_core::config::{AppConfig, DatabaseConfig};
use clubscreen_entity::{Allotment, AllotmentCredential, PublicationState};

/// Test application context.
pub struct TestApp {
    /// The Axum router for making test requests.
    pub router: Router,
    /// Directory handle for provisioning fixtures.
    pub directory: Arc<MemoryAllotmentDirectory>,
    /// Registry handle for occupancy assertions and backdating.
    pub registry: Arc<MemoryLeaseRegistry>,
    /// Hasher for minting fixture secrets.
    pub hasher: SecretHasher,
}

impl TestApp {
    /// Create a new test application over in-memory stores.
    pub fn new() -> Self {
        let config = test_config();

        let directory = Arc::new(MemoryAllotmentDirectory::new());
        let registry = Arc::new(MemoryLeaseRegistry::new(&config.lease));

        let directory_dyn: Arc<dyn AllotmentDirectory> = directory.clone();
        let registry_dyn: Arc<dyn LeaseRegistry> = registry.clone();

        let credential_store = Arc::new(CredentialStore::new(
            Arc::clone(&directory_dyn),
            SecretHasher::new(),
        ));
        let identity = Arc::new(IdentityCodec::new(&config.auth));
        let admission = Arc::new(SessionAdmission::new(
            Arc::clone(&credential_store),
            Arc::clone(&directory_dyn),
            Arc::clone(&identity),
            Arc::clone(&registry_dyn),
            SessionTokenIssuer::new(),
        ));
        let heartbeat = Arc::new(HeartbeatService::new(Arc::clone(&registry_dyn)));
        let playback = Arc::new(PlaybackGate::new(
            Arc::clone(&registry_dyn),
            Arc::clone(&directory_dyn),
            config.lease.clone(),
        ));

        let state = clubscreen_api::state::AppState {
            config: Arc::new(config),
            credential_store,
            identity,
            admission,
            heartbeat,
            playback,
        };

        let router = clubscreen_api::router::build_router(state);

        Self {
            router,
            directory,
            registry,
            hasher: SecretHasher::new(),
        }
    }

    /// Provision a game in the given publication state.
    pub fn provision_game(&self, state: PublicationState) -> Uuid {
        let game_id = Uuid::new_v4();
        self.directory.insert_game(game_id, state);
        game_id
    }

    /// Provision an active allotment with an access code. Returns its ID.
    pub fn provision_allotment(&self, game_id: Uuid, capacity: i32, access_code: &str) -> Uuid {
        let allotment = Allotment {
            id: Uuid::new_v4(),
            game_id,
            club_name: "FC Integration".to_string(),
            capacity,
            active: true,
            access_code_hash: Some(self.hasher.hash_secret(access_code).unwrap()),
            preview_ends_at: None,
            created_at: Utc::now(),
        };
        let id = allotment.id;
        self.directory.insert_allotment(allotment);
        id
    }

    /// Provision a per-seat member credential for an allotment.
    pub fn provision_member(&self, allotment_id: Uuid, username: &str, secret: &str) {
        self.directory.insert_credential(AllotmentCredential {
            id: Uuid::new_v4(),
            allotment_id,
            username: username.to_string(),
            secret_hash: self.hasher.hash_secret(secret).unwrap(),
            created_at: Utc::now(),
        });
    }

    /// Rewind a session token's heartbeat, as if the client went quiet.
    pub async fn backdate_token(&self, session_token: &str, seconds: i64) {
        self.registry
            .backdate_heartbeat(
                &SessionTokenIssuer::digest(session_token),
                chrono::Duration::seconds(seconds),
            )
            .await;
    }

    /// Make an HTTP request to the test app.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        bearer: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = bearer {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Start a session with an access code and return the session token.
    pub async fn start_session(&self, game_id: Uuid, access_code: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/start-session",
                Some(serde_json::json!({
                    "game_ref": game_id,
                    "access_code": access_code,
                })),
                None,
            )
            .await;

        assert_eq!(
            response.status,
            StatusCode::OK,
            "start-session failed: {:?}",
            response.body
        );

        response.data("session_token")
    }
}

/// Response from a test request.
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Parsed JSON body.
    pub body: Value,
}

impl TestResponse {
    /// Extract a string field from the `data` envelope.
    pub fn data(&self, field: &str) -> String {
        self.body
            .get("data")
            .and_then(|d| d.get(field))
            .and_then(|v| v.as_str())
            .unwrap_or_else(|| panic!("No '{field}' in response: {:?}", self.body))
            .to_string()
    }

    /// The machine-readable error code of an error body.
    pub fn error_code(&self) -> String {
        self.body
            .get("error")
            .and_then(|v| v.as_str())
            .unwrap_or_else(|| panic!("No 'error' in response: {:?}", self.body))
            .to_string()
    }
}

fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            shutdown_grace_seconds: 5,
            cors: CorsConfig::default(),
        },
        database: DatabaseConfig {
            url: "postgres://unused-in-memory-tests".to_string(),
            max_connections: 1,
            min_connections: 1,
            connect_timeout_seconds: 1,
            idle_timeout_seconds: 60,
        },
        auth: AuthConfig {
            jwt_secret: "integration-test-secret".to_string(),
            identity_ttl_minutes: 30,
        },
        lease: LeaseConfig {
            heartbeat_ttl_seconds: 90,
            heartbeat_interval_seconds: 45,
            reaper: Default::default(),
        },
        logging: LoggingConfig::default(),
    }
}
