// Profile database operations

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};

use super::lock_wallet;
use crate::db::error::DbError;
use crate::entity::{profiles, support_logs};
use crate::eth::Address;

/// Stored in `nft_token_id` while a mint for the profile is in flight
pub const NFT_MINT_PENDING: &str = "pending";

/// User-editable profile fields; a submission replaces all of them
#[derive(Debug, Clone)]
pub struct ProfileFields {
    pub name: String,
    pub bio: String,
    pub avatar_url: Option<String>,
    pub farcaster_handle: Option<String>,
    pub github_handle: Option<String>,
    pub twitter_handle: Option<String>,
    pub blog_url: Option<String>,
    pub projects: serde_json::Value,
}

/// Repository for profile database operations
pub struct ProfileRepository {
    conn: DatabaseConnection,
}

impl ProfileRepository {
    /// Creates a new profile repository with database connection
    pub fn new(conn: DatabaseConnection) -> Self {
        ProfileRepository { conn }
    }

    /// Looks up a profile by its wallet address
    pub async fn find_by_address(
        &self,
        address: Address,
    ) -> Result<Option<profiles::Model>, DbError> {
        profiles::Entity::find()
            .filter(profiles::Column::WalletAddress.eq(address.to_checksum(None)))
            .one(&self.conn)
            .await
            .map_err(Into::into)
    }

    /// Creates or fully replaces the profile for a wallet.
    ///
    /// Returns the stored profile and whether it was newly created. A new
    /// profile starts its cached support count from the support entries
    /// already logged for the wallet.
    pub async fn upsert(
        &self,
        address: Address,
        fields: ProfileFields,
    ) -> Result<(profiles::Model, bool), DbError> {
        let key = address.to_checksum(None);
        let now = Utc::now();
        let txn = self.conn.begin().await?;
        lock_wallet(&txn, &key).await?;

        let existing = profiles::Entity::find()
            .filter(profiles::Column::WalletAddress.eq(key.as_str()))
            .one(&txn)
            .await?;

        let result = match existing {
            Some(current) => {
                // a changed handle must be verified again
                let verified = current.farcaster_verified
                    && current.farcaster_handle == fields.farcaster_handle;

                let mut active: profiles::ActiveModel = current.into();
                active.name = Set(fields.name);
                active.bio = Set(fields.bio);
                active.avatar_url = Set(fields.avatar_url);
                active.farcaster_handle = Set(fields.farcaster_handle);
                active.farcaster_verified = Set(verified);
                active.github_handle = Set(fields.github_handle);
                active.twitter_handle = Set(fields.twitter_handle);
                active.blog_url = Set(fields.blog_url);
                active.projects = Set(fields.projects);
                active.last_updated = Set(now);
                (active.update(&txn).await?, false)
            }
            None => {
                let logged = support_logs::Entity::find()
                    .filter(support_logs::Column::RecipientAddress.eq(key.as_str()))
                    .count(&txn)
                    .await?;

                let active = profiles::ActiveModel {
                    wallet_address: Set(key),
                    name: Set(fields.name),
                    bio: Set(fields.bio),
                    avatar_url: Set(fields.avatar_url),
                    farcaster_handle: Set(fields.farcaster_handle),
                    farcaster_verified: Set(false),
                    github_handle: Set(fields.github_handle),
                    twitter_handle: Set(fields.twitter_handle),
                    blog_url: Set(fields.blog_url),
                    projects: Set(fields.projects),
                    nft_token_id: Set(None),
                    support_count: Set(logged as i64),
                    created_at: Set(now),
                    last_updated: Set(now),
                    ..Default::default()
                };
                (active.insert(&txn).await?, true)
            }
        };

        txn.commit().await?;
        Ok(result)
    }

    /// Profiles with the highest cached support count, most recently updated first on ties
    pub async fn top_by_support_count(&self, limit: u64) -> Result<Vec<profiles::Model>, DbError> {
        profiles::Entity::find()
            .order_by_desc(profiles::Column::SupportCount)
            .order_by_desc(profiles::Column::LastUpdated)
            .limit(limit)
            .all(&self.conn)
            .await
            .map_err(Into::into)
    }

    /// Sets the Farcaster handle and its verification flag. `None` if no profile exists.
    pub async fn set_farcaster(
        &self,
        address: Address,
        handle: &str,
        verified: bool,
    ) -> Result<Option<profiles::Model>, DbError> {
        let Some(current) = self.find_by_address(address).await? else {
            return Ok(None);
        };

        let mut active: profiles::ActiveModel = current.into();
        active.farcaster_handle = Set(Some(handle.to_string()));
        active.farcaster_verified = Set(verified);
        active.last_updated = Set(Utc::now());
        Ok(Some(active.update(&self.conn).await?))
    }

    /// Reserves the profile for an NFT mint by moving `nft_token_id` from
    /// null to the pending marker. False when there is no profile or it
    /// already holds a token id or a pending mint.
    pub async fn claim_nft_mint(&self, address: Address) -> Result<bool, DbError> {
        let result = profiles::Entity::update_many()
            .col_expr(profiles::Column::NftTokenId, Expr::value(NFT_MINT_PENDING))
            .filter(profiles::Column::WalletAddress.eq(address.to_checksum(None)))
            .filter(profiles::Column::NftTokenId.is_null())
            .exec(&self.conn)
            .await?;
        Ok(result.rows_affected == 1)
    }

    /// Drops a pending mint reservation so the mint can be retried
    pub async fn release_nft_mint(&self, address: Address) -> Result<(), DbError> {
        profiles::Entity::update_many()
            .col_expr(profiles::Column::NftTokenId, Expr::value(Option::<String>::None))
            .filter(profiles::Column::WalletAddress.eq(address.to_checksum(None)))
            .filter(profiles::Column::NftTokenId.eq(NFT_MINT_PENDING))
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    /// Records the minted profile NFT. `None` if no profile exists.
    pub async fn set_nft_token_id(
        &self,
        address: Address,
        token_id: &str,
    ) -> Result<Option<profiles::Model>, DbError> {
        let Some(current) = self.find_by_address(address).await? else {
            return Ok(None);
        };

        let mut active: profiles::ActiveModel = current.into();
        active.nft_token_id = Set(Some(token_id.to_string()));
        active.last_updated = Set(Utc::now());
        Ok(Some(active.update(&self.conn).await?))
    }
}
