// Handler for Farcaster verification

use axum::{extract::State, Json};

use crate::error::ApiResult;
use crate::handlers::{ApiJson, AppState};
use crate::models::{FarcasterVerifyRequest, FarcasterVerifyResponse};
use crate::services::farcaster_service;

/// Handler for POST /api/farcaster/verify
pub async fn verify_farcaster(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<FarcasterVerifyRequest>,
) -> ApiResult<Json<FarcasterVerifyResponse>> {
    let response = farcaster_service::verify(&state, request).await?;
    Ok(Json(response))
}
