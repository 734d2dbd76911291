//! SeaORM Entity for profiles table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// EIP-55 checksum form
    #[sea_orm(column_type = "Text", unique)]
    pub wallet_address: String,

    #[sea_orm(column_type = "Text")]
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub bio: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub avatar_url: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub farcaster_handle: Option<String>,
    pub farcaster_verified: bool,
    #[sea_orm(column_type = "Text", nullable)]
    pub github_handle: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub twitter_handle: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub blog_url: Option<String>,

    /// Ordered list of showcased works
    pub projects: Json,

    #[sea_orm(column_type = "Text", nullable)]
    pub nft_token_id: Option<String>,

    /// Cached count of support-log entries naming this wallet as recipient
    pub support_count: i64,

    pub created_at: DateTimeUtc,
    pub last_updated: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
