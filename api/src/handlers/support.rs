// Handlers for support (tip) endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use crate::error::ApiResult;
use crate::handlers::{ApiJson, AppState};
use crate::models::{
    SendSupportRequest, SupportListQuery, SupportListResponse, SupportLogRequest,
    SupportLogResponse,
};
use crate::services::support_service;

/// Handler for POST /api/support/log
pub async fn log_support(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SupportLogRequest>,
) -> ApiResult<(StatusCode, Json<SupportLogResponse>)> {
    let entry = support_service::log_support(&state, request).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// Handler for POST /api/support/send
pub async fn send_support(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SendSupportRequest>,
) -> ApiResult<(StatusCode, Json<SupportLogResponse>)> {
    let entry = support_service::send_support(&state, request).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// Handler for GET /api/support/{address}?limit=N
pub async fn list_support(
    State(state): State<AppState>,
    Path(address): Path<String>,
    Query(params): Query<SupportListQuery>,
) -> ApiResult<Json<SupportListResponse>> {
    let response = support_service::list_support(&state, &address, params.limit).await?;
    Ok(Json(response))
}

/// Handler for GET /api/support/message/{cid}
pub async fn get_support_message(
    State(state): State<AppState>,
    Path(cid): Path<String>,
) -> ApiResult<Json<Value>> {
    let message = support_service::get_support_message(&state, &cid).await?;
    Ok(Json(message))
}
