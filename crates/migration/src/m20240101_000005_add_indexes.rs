use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Ad: author lookups for per-user ad counts
        manager
            .create_index(
                Index::create()
                    .name("idx_ad_author")
                    .table(Ad::Table)
                    .col(Ad::AuthorId)
                    .to_owned(),
            )
            .await?;

        // Ad: list ordering
        manager
            .create_index(
                Index::create()
                    .name("idx_ad_price")
                    .table(Ad::Table)
                    .col(Ad::Price)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ad_category")
                    .table(Ad::Table)
                    .col(Ad::CategoryId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_location")
                    .table(User::Table)
                    .col(User::LocationId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_ad_author").table(Ad::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_ad_price").table(Ad::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_ad_category").table(Ad::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_user_location").table(User::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Ad { Table, AuthorId, Price, CategoryId }

#[derive(DeriveIden)]
enum User { Table, LocationId }
