// Farcaster handle verification

use crate::error::{ApiError, ApiResult};
use crate::eth::parse_address;
use crate::handlers::AppState;
use crate::models::{FarcasterVerifyRequest, FarcasterVerifyResponse};
use crate::services::validation;

/// Marks the wallet's Farcaster handle as verified.
///
/// No signature or Farcaster hub check is performed; the handle is trusted
/// as submitted by the wallet owner.
pub async fn verify(
    state: &AppState,
    request: FarcasterVerifyRequest,
) -> ApiResult<FarcasterVerifyResponse> {
    let address = parse_address(&request.wallet_address)?;
    let handle = validation::handle("farcasterHandle", Some(request.farcaster_handle))?
        .ok_or_else(|| ApiError::InvalidRequest("farcasterHandle is required".to_string()))?;

    let profile = state
        .repositories
        .profile
        .set_farcaster(address, &handle, true)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Profile for {} not found", address)))?;

    tracing::info!("Verified Farcaster handle @{} for {}", handle, address);

    Ok(FarcasterVerifyResponse {
        success: true,
        message: format!(
            "Farcaster handle @{} verified for {}",
            handle, profile.wallet_address
        ),
    })
}
