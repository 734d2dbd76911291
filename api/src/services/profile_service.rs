// Profile business logic: submission, lookup, trending and NFT minting

use std::future::Future;
use std::time::Duration;

use futures::stream::{self, StreamExt};

use crate::entity::profiles;
use crate::error::{ApiError, ApiResult};
use crate::db::repositories::NFT_MINT_PENDING;
use crate::eth::{parse_address, Address, ChainError};
use crate::handlers::AppState;
use crate::models::{MintResponse, ProfileRequest, ProfileResponse, TrendingProfile};
use crate::services::contract_service::SupportContract;
use crate::services::validation;

/// Maximum number of entries in the trending list
pub const TRENDING_LIMIT: u64 = 10;

/// Creates or replaces a profile. The flag is true when it was created.
pub async fn submit_profile(
    state: &AppState,
    request: ProfileRequest,
) -> ApiResult<(ProfileResponse, bool)> {
    let (address, fields) = validation::profile_fields(request)?;

    let (model, created) = state.repositories.profile.upsert(address, fields).await?;
    if created {
        tracing::info!("Created profile for {}", address);
    } else {
        tracing::info!("Updated profile for {}", address);
    }

    Ok((model.into(), created))
}

/// Returns the stored profile with its live on-chain support count
pub async fn get_profile(state: &AppState, raw_address: &str) -> ApiResult<ProfileResponse> {
    let address = parse_address(raw_address)?;
    let model = find_profile(state, address).await?;

    let count = with_read_timeout(
        state.config.contract_read_timeout,
        format!("support count of {}", address),
        state.contract.get_support_count(address),
    )
    .await?;

    let mut response = ProfileResponse::from(model);
    response.support_count = Some(count.to_string());
    Ok(response)
}

/// Top profiles by cached support count, each enriched with on-chain supporters.
///
/// Reads run with bounded concurrency and a per-read timeout. A failed read
/// marks that entry's supporters unavailable instead of failing the list.
pub async fn get_trending_profiles(state: &AppState) -> ApiResult<Vec<TrendingProfile>> {
    let profiles = state
        .repositories
        .profile
        .top_by_support_count(TRENDING_LIMIT)
        .await?;

    let read_timeout = state.config.contract_read_timeout;
    let contract = state.contract.as_ref();

    let trending = stream::iter(profiles)
        .map(|model| enrich_with_supporters(contract, model, read_timeout))
        .buffered(state.config.trending_concurrency)
        .collect::<Vec<_>>()
        .await;

    Ok(trending)
}

/// Mints the profile NFT for an existing profile and stores its token id.
///
/// The profile is reserved before the transaction is sent, so concurrent
/// requests for one wallet produce a single mint.
pub async fn mint_profile_nft(state: &AppState, raw_address: &str) -> ApiResult<MintResponse> {
    let address = parse_address(raw_address)?;
    let repo = &state.repositories.profile;

    if !repo.claim_nft_mint(address).await? {
        let model = find_profile(state, address).await?;
        let reason = match model.nft_token_id.as_deref() {
            Some(NFT_MINT_PENDING) => "mint already in progress".to_string(),
            Some(token_id) => format!("already minted (token {})", token_id),
            None => "mint was just released, retry".to_string(),
        };
        return Err(ApiError::Conflict(format!(
            "Profile NFT for {}: {}",
            address, reason
        )));
    }

    let minted = match state.contract.mint_profile_nft(address).await {
        Ok(minted) => minted,
        // the token may exist on-chain; keep the reservation
        Err(e @ (ChainError::Confirmation(_) | ChainError::MissingEvent(_))) => {
            tracing::error!("Profile NFT mint for {} left pending: {}", address, e);
            return Err(e.into());
        }
        Err(e) => {
            if let Err(release) = repo.release_nft_mint(address).await {
                tracing::error!("Failed to release NFT mint for {}: {}", address, release);
            }
            return Err(e.into());
        }
    };
    tracing::info!(
        "Minted profile NFT {} for {} in {}",
        minted.token_id,
        address,
        minted.transaction_hash
    );

    let token_id = minted.token_id.to_string();
    repo.set_nft_token_id(address, &token_id)
        .await
        .inspect_err(|e| {
            tracing::error!(
                "Profile NFT {} for {} confirmed on-chain in {} but not recorded: {}",
                token_id,
                address,
                minted.transaction_hash,
                e
            )
        })?
        .ok_or_else(|| not_found(address))?;

    Ok(MintResponse {
        wallet_address: address.to_checksum(None),
        token_id,
        transaction_hash: minted.transaction_hash.to_string(),
    })
}

async fn find_profile(state: &AppState, address: Address) -> ApiResult<profiles::Model> {
    state
        .repositories
        .profile
        .find_by_address(address)
        .await?
        .ok_or_else(|| not_found(address))
}

fn not_found(address: Address) -> ApiError {
    ApiError::NotFound(format!("Profile for {} not found", address))
}

async fn enrich_with_supporters(
    contract: &dyn SupportContract,
    model: profiles::Model,
    read_timeout: Duration,
) -> TrendingProfile {
    let supporters = match parse_address(&model.wallet_address) {
        Ok(address) => with_read_timeout(
            read_timeout,
            format!("supporters of {}", address),
            contract.get_supporters(address),
        )
        .await
        .map_err(|e| tracing::warn!("Trending: {}", e))
        .ok(),
        Err(e) => {
            tracing::warn!("Trending: stored address is invalid: {}", e);
            None
        }
    };

    TrendingProfile {
        supporters_available: supporters.is_some(),
        supporters: supporters
            .unwrap_or_default()
            .iter()
            .map(|supporter| supporter.to_checksum(None))
            .collect(),
        profile: model.into(),
    }
}

async fn with_read_timeout<T>(
    limit: Duration,
    what: String,
    read: impl Future<Output = Result<T, ChainError>>,
) -> Result<T, ChainError> {
    tokio::time::timeout(limit, read)
        .await
        .map_err(|_| ChainError::Timeout(what))?
}
