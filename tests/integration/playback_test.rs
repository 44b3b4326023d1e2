//! Integration tests for the playback authorization check.

use axum::http::StatusCode;

use clubscreen_entity::PublicationState;

use crate::helpers::TestApp;

#[tokio::test]
async fn fresh_session_is_authorized_for_playback() {
    let app = TestApp::new();
    let game = app.provision_game(PublicationState::Published);
    app.provision_allotment(game, 1, "terrace-42");
    let token = app.start_session(game, "terrace-42").await;

    let response = app
        .request("GET", "/api/playback/authorize", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(
        response
            .body
            .get("data")
            .and_then(|d| d.get("fresh_until"))
            .is_some()
    );
}

#[tokio::test]
async fn unknown_token_is_not_authorized() {
    let app = TestApp::new();

    let response = app
        .request("GET", "/api/playback/authorize", None, Some("never-issued"))
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn stale_session_is_not_authorized() {
    let app = TestApp::new();
    let game = app.provision_game(PublicationState::Published);
    app.provision_allotment(game, 1, "terrace-42");
    let token = app.start_session(game, "terrace-42").await;

    app.backdate_token(&token, 120).await;

    let response = app
        .request("GET", "/api/playback/authorize", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn withdrawing_the_game_cuts_playback_but_not_heartbeats() {
    let app = TestApp::new();
    let game = app.provision_game(PublicationState::Published);
    let allotment = app.provision_allotment(game, 1, "terrace-42");
    let token = app.start_session(game, "terrace-42").await;

    app.directory
        .set_game_state(game, PublicationState::Withdrawn);

    let playback = app
        .request("GET", "/api/playback/authorize", None, Some(&token))
        .await;
    assert_eq!(playback.status, StatusCode::FORBIDDEN);
    assert_eq!(playback.error_code(), "GAME_NOT_PUBLISHED");

    // The admitted viewer's lease stays alive; only playback is gated.
    let heartbeat = app
        .request(
            "POST",
            "/api/heartbeat",
            Some(serde_json::json!({
                "session_token": token,
                "allotment_ref": allotment,
            })),
            None,
        )
        .await;
    assert_eq!(heartbeat.status, StatusCode::OK);
}

#[tokio::test]
async fn health_endpoint_responds() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
}
