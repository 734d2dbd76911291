// Handlers Module
// HTTP endpoint handlers and router assembly

pub mod farcaster;
pub mod health;
pub mod profiles;
pub mod support;

use std::sync::Arc;
use std::time::Duration;

use axum::extract::FromRequest;
use axum::routing::{get, post};
use axum::Router;
use http::{header, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::db::Repositories;
use crate::error::ApiError;
use crate::services::contract_service::SupportContract;
use crate::services::ipfs_service::ContentStore;

/// Largest accepted request body, above a profile with every field at its limit
const MAX_BODY_BYTES: usize = 256 * 1024;

/// Shared dependencies for request handlers
pub struct AppContext {
    pub config: Arc<ApiConfig>,
    pub repositories: Repositories,
    pub contract: Arc<dyn SupportContract>,
    pub ipfs: Arc<dyn ContentStore>,
}

// Type alias for the application state
pub type AppState = Arc<AppContext>;

/// JSON body extractor whose rejections use the API error shape
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Builds the API router with CORS and request tracing
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::ORIGIN,
            header::AUTHORIZATION,
        ])
        .expose_headers([header::CONTENT_TYPE, header::CONTENT_LENGTH])
        .max_age(Duration::from_secs(3600));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/api/profile", post(profiles::submit_profile))
        .route("/api/profile/{address}", get(profiles::get_profile))
        .route("/api/profile/{address}/mint", post(profiles::mint_profile_nft))
        .route("/api/profiles/trending", get(profiles::get_trending_profiles))
        .route("/api/farcaster/verify", post(farcaster::verify_farcaster))
        .route("/api/support/log", post(support::log_support))
        .route("/api/support/send", post(support::send_support))
        .route("/api/support/message/{cid}", get(support::get_support_message))
        .route("/api/support/{address}", get(support::list_support))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests;
