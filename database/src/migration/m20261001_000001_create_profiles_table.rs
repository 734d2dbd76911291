use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20261001_000001_create_profiles_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Profiles::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Profiles::WalletAddress)
                            .text()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Profiles::Name).text().not_null())
                    .col(ColumnDef::new(Profiles::Bio).text().not_null().default(""))
                    .col(ColumnDef::new(Profiles::AvatarUrl).text().null())
                    .col(ColumnDef::new(Profiles::FarcasterHandle).text().null())
                    .col(
                        ColumnDef::new(Profiles::FarcasterVerified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Profiles::GithubHandle).text().null())
                    .col(ColumnDef::new(Profiles::TwitterHandle).text().null())
                    .col(ColumnDef::new(Profiles::BlogUrl).text().null())
                    .col(
                        ColumnDef::new(Profiles::Projects)
                            .json()
                            .not_null()
                            .default(Expr::cust("'[]'::json")),
                    )
                    .col(ColumnDef::new(Profiles::NftTokenId).text().null())
                    .col(
                        ColumnDef::new(Profiles::SupportCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Profiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Profiles::LastUpdated)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Trending sorts by cached count
        manager
            .create_index(
                Index::create()
                    .name("idx_profiles_support_count")
                    .table(Profiles::Table)
                    .col(Profiles::SupportCount)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Profiles::Table).to_owned())
            .await
    }
}

/// Profiles table definition
#[derive(Iden)]
enum Profiles {
    Table,
    Id,
    WalletAddress,
    Name,
    Bio,
    AvatarUrl,
    FarcasterHandle,
    FarcasterVerified,
    GithubHandle,
    TwitterHandle,
    BlogUrl,
    Projects,
    NftTokenId,
    SupportCount,
    CreatedAt,
    LastUpdated,
}
