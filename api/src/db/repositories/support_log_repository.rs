// Support log database operations

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};

use super::lock_wallet;
use crate::db::error::DbError;
use crate::entity::{profiles, support_logs};
use crate::eth::{Address, B256};

/// A validated support event ready to be logged
#[derive(Debug, Clone)]
pub struct NewSupportLog {
    pub supporter: Address,
    pub recipient: Address,
    pub amount: String,
    pub transaction_hash: B256,
    pub ipfs_hash: Option<String>,
}

/// Repository for the append-only support log
pub struct SupportLogRepository {
    conn: DatabaseConnection,
}

impl SupportLogRepository {
    /// Creates a new support log repository with database connection
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Appends one entry and bumps the recipient's cached count by one.
    ///
    /// Both writes share a transaction, locked on the recipient, so the counter
    /// never runs ahead of or behind the log even while the recipient's profile
    /// is being created. A recipient without a profile only gets the entry.
    pub async fn record(&self, entry: NewSupportLog) -> Result<support_logs::Model, DbError> {
        let recipient = entry.recipient.to_checksum(None);
        let txn = self.conn.begin().await?;
        lock_wallet(&txn, &recipient).await?;

        let model = support_logs::ActiveModel {
            supporter_address: Set(entry.supporter.to_checksum(None)),
            recipient_address: Set(recipient.clone()),
            amount: Set(entry.amount),
            transaction_hash: Set(entry.transaction_hash.to_string()),
            ipfs_hash: Set(entry.ipfs_hash),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        profiles::Entity::update_many()
            .col_expr(
                profiles::Column::SupportCount,
                Expr::col(profiles::Column::SupportCount).add(1),
            )
            .filter(profiles::Column::WalletAddress.eq(recipient))
            .exec(&txn)
            .await?;

        txn.commit().await?;
        Ok(model)
    }

    /// Entries naming the address as recipient, newest first
    pub async fn find_by_recipient(
        &self,
        recipient: Address,
        limit: u64,
    ) -> Result<Vec<support_logs::Model>, DbError> {
        support_logs::Entity::find()
            .filter(support_logs::Column::RecipientAddress.eq(recipient.to_checksum(None)))
            .order_by_desc(support_logs::Column::CreatedAt)
            .order_by_desc(support_logs::Column::Id)
            .limit(limit)
            .all(&self.conn)
            .await
            .map_err(Into::into)
    }

    /// Number of entries naming the address as recipient
    pub async fn count_for_recipient(&self, recipient: Address) -> Result<u64, DbError> {
        support_logs::Entity::find()
            .filter(support_logs::Column::RecipientAddress.eq(recipient.to_checksum(None)))
            .count(&self.conn)
            .await
            .map_err(Into::into)
    }

    /// Whether a transaction has already been logged
    pub async fn exists_tx_hash(&self, hash: B256) -> Result<bool, DbError> {
        let count = support_logs::Entity::find()
            .filter(support_logs::Column::TransactionHash.eq(hash.to_string()))
            .count(&self.conn)
            .await?;
        Ok(count > 0)
    }
}
