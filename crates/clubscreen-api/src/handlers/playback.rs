//! Playback authorization handler for the video-delivery collaborator.

use axum::Json;
use axum::extract::State;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;

use crate::dto::response::{ApiResponse, PlaybackResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/playback/authorize
///
/// The synchronous "is this token's lease currently fresh?" check the
/// video-delivery collaborator makes before issuing a manifest URL.
pub async fn authorize(
    State(state): State<AppState>,
    TypedHeader(Authorization(bearer)): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<ApiResponse<PlaybackResponse>>, ApiError> {
    let auth = state.playback.authorize(bearer.token()).await?;

    Ok(Json(ApiResponse::ok(PlaybackResponse {
        allotment_ref: auth.allotment_id,
        lease_ref: auth.lease_id,
        fresh_until: auth.fresh_until,
    })))
}
