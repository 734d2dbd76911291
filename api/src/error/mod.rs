use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::db::DbError;
use crate::eth::{AddressError, AmountError, ChainError};
use crate::services::ipfs_service::IpfsError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Upstream error: {0}")]
    UpstreamError(String),
    #[error("Service unavailable: {0}")]
    Unavailable(String),
    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, err_msg) = match self {
            ApiError::DatabaseError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::UpstreamError(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ApiError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "error": err_msg
        }));

        (status, body).into_response()
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        tracing::error!("{}", err);
        match err {
            DbError::ConnectionError(msg) | DbError::QueryError(msg) => {
                ApiError::DatabaseError(msg)
            }
            DbError::Conflict(msg) => ApiError::Conflict(msg),
        }
    }
}

impl From<ChainError> for ApiError {
    fn from(err: ChainError) -> Self {
        tracing::error!("Contract call failed: {}", err);
        match err {
            ChainError::NotConfigured(msg) => ApiError::Unavailable(msg),
            other => ApiError::UpstreamError(other.to_string()),
        }
    }
}

impl From<IpfsError> for ApiError {
    fn from(err: IpfsError) -> Self {
        tracing::error!("IPFS call failed: {}", err);
        match err {
            IpfsError::NotConfigured(msg) => ApiError::Unavailable(msg),
            other => ApiError::UpstreamError(other.to_string()),
        }
    }
}

impl From<AddressError> for ApiError {
    fn from(err: AddressError) -> Self {
        ApiError::InvalidRequest(err.to_string())
    }
}

/// Malformed JSON, wrong content type and missing fields are all client errors
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

impl From<AmountError> for ApiError {
    fn from(err: AmountError) -> Self {
        ApiError::InvalidRequest(err.to_string())
    }
}
