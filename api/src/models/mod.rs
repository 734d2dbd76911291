// API request/response models
use serde::{Deserialize, Serialize};

use crate::db::repositories::NFT_MINT_PENDING;
use crate::entity::{profiles, support_logs};

/// A showcased work on a profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Request body for POST /api/profile
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    pub wallet_address: String,
    pub name: String,
    #[serde(default)]
    pub bio: String,
    pub avatar_url: Option<String>,
    pub farcaster_handle: Option<String>,
    pub github_handle: Option<String>,
    pub twitter_handle: Option<String>,
    pub blog_url: Option<String>,
    #[serde(default)]
    pub projects: Vec<Project>,
}

/// Profile document returned by the profile endpoints
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub wallet_address: String,
    pub name: String,
    pub bio: String,
    pub avatar_url: Option<String>,
    pub farcaster_handle: Option<String>,
    pub farcaster_verified: bool,
    pub github_handle: Option<String>,
    pub twitter_handle: Option<String>,
    pub blog_url: Option<String>,
    pub projects: Vec<Project>,
    pub nft_token_id: Option<String>,
    /// Live on-chain count, only present when it was read
    #[serde(skip_serializing_if = "Option::is_none")]
    pub support_count: Option<String>,
    pub cached_support_count: i64,
    pub created_at: String,
    pub last_updated: String,
}

impl From<profiles::Model> for ProfileResponse {
    fn from(model: profiles::Model) -> Self {
        // rows are written from validated input; unreadable legacy data shows as empty
        let projects = serde_json::from_value(model.projects).unwrap_or_default();
        ProfileResponse {
            wallet_address: model.wallet_address,
            name: model.name,
            bio: model.bio,
            avatar_url: model.avatar_url,
            farcaster_handle: model.farcaster_handle,
            farcaster_verified: model.farcaster_verified,
            github_handle: model.github_handle,
            twitter_handle: model.twitter_handle,
            blog_url: model.blog_url,
            projects,
            nft_token_id: model.nft_token_id.filter(|id| id != NFT_MINT_PENDING),
            support_count: None,
            cached_support_count: model.support_count,
            created_at: model.created_at.to_rfc3339(),
            last_updated: model.last_updated.to_rfc3339(),
        }
    }
}

/// Trending entry: a profile plus its on-chain supporters
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingProfile {
    #[serde(flatten)]
    pub profile: ProfileResponse,
    pub supporters: Vec<String>,
    /// False when the supporters read failed or timed out
    pub supporters_available: bool,
}

/// Request body for POST /api/farcaster/verify
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarcasterVerifyRequest {
    pub wallet_address: String,
    pub farcaster_handle: String,
}

/// Response structure for farcaster verification
#[derive(Debug, Serialize)]
pub struct FarcasterVerifyResponse {
    pub success: bool,
    pub message: String,
}

/// Request body for POST /api/support/log
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportLogRequest {
    pub supporter_address: String,
    pub recipient_address: String,
    pub amount: String,
    pub transaction_hash: String,
    pub ipfs_hash: Option<String>,
}

/// Request body for POST /api/support/send
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendSupportRequest {
    pub recipient_address: String,
    pub amount: String,
    pub message: Option<String>,
}

/// Support log document
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportLogResponse {
    pub id: i32,
    pub supporter_address: String,
    pub recipient_address: String,
    pub amount: String,
    pub transaction_hash: String,
    pub ipfs_hash: Option<String>,
    pub timestamp: String,
}

impl From<support_logs::Model> for SupportLogResponse {
    fn from(model: support_logs::Model) -> Self {
        SupportLogResponse {
            id: model.id,
            supporter_address: model.supporter_address,
            recipient_address: model.recipient_address,
            amount: model.amount,
            transaction_hash: model.transaction_hash,
            ipfs_hash: model.ipfs_hash,
            timestamp: model.created_at.to_rfc3339(),
        }
    }
}

/// Query parameters for GET /api/support/{address}
#[derive(Debug, Deserialize, Default)]
pub struct SupportListQuery {
    pub limit: Option<u64>,
}

/// Response structure for GET /api/support/{address}
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportListResponse {
    pub address: String,
    pub total: u64,
    pub entries: Vec<SupportLogResponse>,
}

/// Support message document stored on IPFS
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportMessage {
    pub message: String,
    pub from: String,
    pub to: String,
    pub amount: String,
    pub timestamp: String,
}

/// Response structure for POST /api/profile/{address}/mint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MintResponse {
    pub wallet_address: String,
    pub token_id: String,
    pub transaction_hash: String,
}
