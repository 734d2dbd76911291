use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20261001_000002_create_support_logs_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SupportLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SupportLogs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SupportLogs::SupporterAddress).text().not_null())
                    .col(ColumnDef::new(SupportLogs::RecipientAddress).text().not_null())
                    .col(ColumnDef::new(SupportLogs::Amount).text().not_null())
                    .col(ColumnDef::new(SupportLogs::TransactionHash).text().not_null())
                    .col(ColumnDef::new(SupportLogs::IpfsHash).text().null())
                    .col(
                        ColumnDef::new(SupportLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_support_logs_recipient")
                    .table(SupportLogs::Table)
                    .col(SupportLogs::RecipientAddress)
                    .col(SupportLogs::CreatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // A transaction can only be logged once
        manager
            .create_index(
                Index::create()
                    .unique()
                    .name("idx_support_logs_tx_hash_unique")
                    .table(SupportLogs::Table)
                    .col(SupportLogs::TransactionHash)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SupportLogs::Table).to_owned())
            .await
    }
}

/// Support logs table definition
#[derive(Iden)]
enum SupportLogs {
    Table,
    Id,
    SupporterAddress,
    RecipientAddress,
    Amount,
    TransactionHash,
    IpfsHash,
    CreatedAt,
}
