//! Integration tests for the admission and heartbeat flow.

use axum::http::StatusCode;
use futures::future::join_all;

use clubscreen_auth::lease::LeaseRegistry;
use clubscreen_entity::PublicationState;

use crate::helpers::TestApp;

#[tokio::test]
async fn capacity_two_fills_then_reclaims_a_seat() {
    let app = TestApp::new();
    let game = app.provision_game(PublicationState::Published);
    app.provision_allotment(game, 2, "terrace-42");

    // Two members get in, the third hits the limit.
    let token_a = app.start_session(game, "terrace-42").await;
    let _token_b = app.start_session(game, "terrace-42").await;

    let response = app
        .request(
            "POST",
            "/api/start-session",
            Some(serde_json::json!({
                "game_ref": game,
                "access_code": "terrace-42",
            })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.error_code(), "CAPACITY_EXCEEDED");

    // Viewer A closes the tab; past the TTL their seat frees itself.
    app.backdate_token(&token_a, 91).await;

    let retried = app
        .request(
            "POST",
            "/api/start-session",
            Some(serde_json::json!({
                "game_ref": game,
                "access_code": "terrace-42",
            })),
            None,
        )
        .await;
    assert_eq!(retried.status, StatusCode::OK);
}

#[tokio::test]
async fn invalid_access_code_leaves_no_lease() {
    let app = TestApp::new();
    let game = app.provision_game(PublicationState::Published);
    let allotment = app.provision_allotment(game, 2, "terrace-42");

    let response = app
        .request(
            "POST",
            "/api/start-session",
            Some(serde_json::json!({
                "game_ref": game,
                "access_code": "wrong-code",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "AUTH_FAILED");
    assert_eq!(app.registry.count_fresh(allotment).await.unwrap(), 0);
}

#[tokio::test]
async fn unpublished_game_is_rejected_before_capacity() {
    let app = TestApp::new();
    let game = app.provision_game(PublicationState::Draft);
    // Capacity zero: a capacity check would also reject, but the
    // publication rejection must come first.
    let allotment = app.provision_allotment(game, 0, "terrace-42");

    let response = app
        .request(
            "POST",
            "/api/start-session",
            Some(serde_json::json!({
                "game_ref": game,
                "access_code": "terrace-42",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_code(), "GAME_NOT_PUBLISHED");
    assert_eq!(app.registry.count_fresh(allotment).await.unwrap(), 0);
}

#[tokio::test]
async fn admitted_token_round_trips_through_heartbeat() {
    let app = TestApp::new();
    let game = app.provision_game(PublicationState::Published);
    let allotment = app.provision_allotment(game, 1, "terrace-42");
    let token = app.start_session(game, "terrace-42").await;

    let response = app
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

    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn heartbeat_with_unknown_token_is_404() {
    let app = TestApp::new();
    let game = app.provision_game(PublicationState::Published);
    let allotment = app.provision_allotment(game, 1, "terrace-42");

    let response = app
        .request(
            "POST",
            "/api/heartbeat",
            Some(serde_json::json!({
                "session_token": "never-issued",
                "allotment_ref": allotment,
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn heartbeat_on_stale_token_is_404() {
    let app = TestApp::new();
    let game = app.provision_game(PublicationState::Published);
    let allotment = app.provision_allotment(game, 1, "terrace-42");
    let token = app.start_session(game, "terrace-42").await;

    app.backdate_token(&token, 120).await;

    let response = app
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

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    // The rejected heartbeat must not have revived the lease.
    assert_eq!(app.registry.count_fresh(allotment).await.unwrap(), 0);
}

#[tokio::test]
async fn fifty_racing_admissions_grant_exactly_five_seats() {
    let app = TestApp::new();
    let game = app.provision_game(PublicationState::Published);
    let allotment = app.provision_allotment(game, 5, "terrace-42");

    let attempts = (0..50).map(|_| {
        app.request(
            "POST",
            "/api/start-session",
            Some(serde_json::json!({
                "game_ref": game,
                "access_code": "terrace-42",
            })),
            None,
        )
    });

    let responses = join_all(attempts).await;
    let granted = responses
        .iter()
        .filter(|r| r.status == StatusCode::OK)
        .count();
    let rejected = responses
        .iter()
        .filter(|r| r.status == StatusCode::CONFLICT)
        .count();

    assert_eq!(granted, 5);
    assert_eq!(rejected, 45);
    assert_eq!(app.registry.count_fresh(allotment).await.unwrap(), 5);
}

#[tokio::test]
async fn login_issues_identity_for_the_reuse_path() {
    let app = TestApp::new();
    let game = app.provision_game(PublicationState::Published);
    let allotment = app.provision_allotment(game, 1, "terrace-42");
    app.provision_member(allotment, "seat-07", "winter-break");

    let login = app
        .request(
            "POST",
            "/api/login",
            Some(serde_json::json!({
                "identifier": "seat-07",
                "secret": "winter-break",
            })),
            None,
        )
        .await;
    assert_eq!(login.status, StatusCode::OK);
    let identity_token = login.data("identity_token");

    let response = app
        .request(
            "POST",
            "/api/start-session",
            Some(serde_json::json!({
                "game_ref": game,
                "use_existing_login": true,
            })),
            Some(&identity_token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(app.registry.count_fresh(allotment).await.unwrap(), 1);
}

#[tokio::test]
async fn login_with_wrong_secret_is_rejected() {
    let app = TestApp::new();
    let game = app.provision_game(PublicationState::Published);
    let allotment = app.provision_allotment(game, 1, "terrace-42");
    app.provision_member(allotment, "seat-07", "winter-break");

    let response = app
        .request(
            "POST",
            "/api/login",
            Some(serde_json::json!({
                "identifier": "seat-07",
                "secret": "summer-break",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "AUTH_FAILED");
}

#[tokio::test]
async fn reuse_path_without_identity_token_is_rejected() {
    let app = TestApp::new();
    let game = app.provision_game(PublicationState::Published);
    app.provision_allotment(game, 1, "terrace-42");

    let response = app
        .request(
            "POST",
            "/api/start-session",
            Some(serde_json::json!({
                "game_ref": game,
                "use_existing_login": true,
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn start_session_without_any_path_is_invalid() {
    let app = TestApp::new();
    let game = app.provision_game(PublicationState::Published);
    app.provision_allotment(game, 1, "terrace-42");

    let response = app
        .request(
            "POST",
            "/api/start-session",
            Some(serde_json::json!({ "game_ref": game })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");
}
