//! Create `ad` table with FKs to `user` (author) and `category`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Ad::Table)
                    .if_not_exists()
                    .col(pk_auto(Ad::Id))
                    .col(string_len(Ad::Name, 200))
                    .col(integer(Ad::AuthorId))
                    .col(integer(Ad::Price).default(0))
                    .col(text_null(Ad::Description))
                    .col(string_len_null(Ad::Image, 255))
                    .col(integer_null(Ad::CategoryId))
                    .col(boolean(Ad::IsPublished).default(false))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ad_author")
                            .from(Ad::Table, Ad::AuthorId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ad_category")
                            .from(Ad::Table, Ad::CategoryId)
                            .to(Category::Table, Category::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Ad::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Ad { Table, Id, Name, AuthorId, Price, Description, Image, CategoryId, IsPublished }

#[derive(DeriveIden)]
enum User { Table, Id }

#[derive(DeriveIden)]
enum Category { Table, Id }
