//! Session handlers — admission and heartbeat.

use axum::Json;
use axum::extract::State;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use validator::Validate;

use clubscreen_auth::credential::AllotmentSelector;
use clubscreen_core::error::AppError;

use crate::dto::request::{HeartbeatRequest, StartSessionRequest};
use crate::dto::response::{ApiResponse, MessageResponse, StartSessionResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/start-session
///
/// Two entry paths into the same capacity-guarded admission: a club
/// access code in the body, or an identity token from `/login` presented
/// as a Bearer header with `use_existing_login: true`.
pub async fn start_session(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    Json(req): Json<StartSessionRequest>,
) -> Result<Json<ApiResponse<StartSessionResponse>>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let grant = if req.use_existing_login {
        let TypedHeader(Authorization(bearer)) = bearer.ok_or_else(|| {
            AppError::authentication("Identity token required for use_existing_login")
        })?;
        state
            .admission
            .admit_with_identity(bearer.token(), req.game_ref)
            .await?
    } else if let Some(access_code) = req.access_code.as_deref() {
        state
            .admission
            .admit_with_secret(
                AllotmentSelector::AccessCode {
                    game_id: req.game_ref,
                },
                access_code,
                req.game_ref,
            )
            .await?
    } else {
        return Err(ApiError::from(AppError::validation(
            "Either access_code or use_existing_login is required",
        )));
    };

    Ok(Json(ApiResponse::ok(StartSessionResponse {
        session_token: grant.token,
        allotment_ref: grant.allotment_id,
        heartbeat_interval_seconds: state.config.lease.heartbeat_interval_seconds,
    })))
}

/// POST /api/heartbeat
///
/// Refreshes a lease's freshness window. `404` means the token is unknown
/// or already stale; the client restarts at `/login` or `/start-session`.
pub async fn heartbeat(
    State(state): State<AppState>,
    Json(req): Json<HeartbeatRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    state
        .heartbeat
        .heartbeat(&req.session_token, req.allotment_ref)
        .await?;

    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "ok".to_string(),
    })))
}
