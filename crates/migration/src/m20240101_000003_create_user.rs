//! Create `user` table with FK to `location`.
//!
//! Deleting a location detaches its users rather than removing them.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(pk_auto(User::Id))
                    .col(string_len(User::Username, 150).unique_key())
                    .col(string_len(User::FirstName, 150).default(""))
                    .col(string_len(User::LastName, 150).default(""))
                    .col(string_len(User::Role, 16).default("member"))
                    .col(integer_null(User::Age))
                    .col(integer_null(User::LocationId))
                    .col(string_len(User::Password, 255))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_location")
                            .from(User::Table, User::LocationId)
                            .to(Location::Table, Location::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(User::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum User { Table, Id, Username, FirstName, LastName, Role, Age, LocationId, Password }

#[derive(DeriveIden)]
enum Location { Table, Id }
