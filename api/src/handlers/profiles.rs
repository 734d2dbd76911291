// Handlers for profile endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::error::ApiResult;
use crate::handlers::{ApiJson, AppState};
use crate::models::{MintResponse, ProfileRequest, ProfileResponse, TrendingProfile};
use crate::services::profile_service;

/// Handler for POST /api/profile - 201 when the profile is created, 200 when replaced
pub async fn submit_profile(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ProfileRequest>,
) -> ApiResult<(StatusCode, Json<ProfileResponse>)> {
    let (profile, created) = profile_service::submit_profile(&state, request).await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(profile)))
}

/// Handler for GET /api/profile/{address}
pub async fn get_profile(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> ApiResult<Json<ProfileResponse>> {
    let profile = profile_service::get_profile(&state, &address).await?;
    Ok(Json(profile))
}

/// Handler for GET /api/profiles/trending
pub async fn get_trending_profiles(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<TrendingProfile>>> {
    let trending = profile_service::get_trending_profiles(&state).await?;
    Ok(Json(trending))
}

/// Handler for POST /api/profile/{address}/mint
pub async fn mint_profile_nft(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> ApiResult<(StatusCode, Json<MintResponse>)> {
    let minted = profile_service::mint_profile_nft(&state, &address).await?;
    Ok((StatusCode::CREATED, Json(minted)))
}
