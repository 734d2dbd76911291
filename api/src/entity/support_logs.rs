//! SeaORM Entity for support_logs table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "support_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(column_type = "Text")]
    pub supporter_address: String,
    #[sea_orm(column_type = "Text", indexed)]
    pub recipient_address: String,

    /// Canonical decimal ETH amount
    #[sea_orm(column_type = "Text")]
    pub amount: String,

    #[sea_orm(column_type = "Text", unique)]
    pub transaction_hash: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub ipfs_hash: Option<String>,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
