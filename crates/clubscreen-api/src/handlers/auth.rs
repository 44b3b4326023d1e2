//! Login handler — member credential check and identity token issuance.

use axum::Json;
use axum::extract::State;
use validator::Validate;

use clubscreen_auth::credential::AllotmentSelector;
use clubscreen_core::error::AppError;

use crate::dto::request::LoginRequest;
use crate::dto::response::{ApiResponse, LoginResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/login
///
/// Validates a per-seat member credential and issues a short-lived
/// identity token. Grants no seat — that only happens at admission.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let allotment = state
        .credential_store
        .validate(
            AllotmentSelector::Member {
                username: &req.identifier,
            },
            &req.secret,
        )
        .await?;

    let (identity_token, expires_at) =
        state
            .identity
            .issue(&req.identifier, allotment.id, allotment.game_id)?;

    Ok(Json(ApiResponse::ok(LoginResponse {
        identity_token,
        allotment_ref: allotment.id,
        expires_at,
    })))
}
