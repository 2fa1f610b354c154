//! Create `collaboration` table: requester company -> target company.
//!
//! Status is stored as text (PENDING, ACCEPTED, REJECTED, CANCELLED).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Collaboration::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Collaboration::Id).big_integer().not_null().auto_increment().primary_key())
                    .col(big_integer(Collaboration::RequesterCompanyId))
                    .col(big_integer(Collaboration::TargetCompanyId))
                    .col(string_len(Collaboration::Status, 32))
                    .col(string_len_null(Collaboration::Message, 1000))
                    .col(boolean(Collaboration::IsActive).default(true))
                    .col(timestamp_with_time_zone(Collaboration::CreatedAt))
                    .col(timestamp_with_time_zone(Collaboration::UpdatedAt))
                    .col(timestamp_with_time_zone_null(Collaboration::DeletedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_collaboration_requester")
                            .from(Collaboration::Table, Collaboration::RequesterCompanyId)
                            .to(Company::Table, Company::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_collaboration_target")
                            .from(Collaboration::Table, Collaboration::TargetCompanyId)
                            .to(Company::Table, Company::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Collaboration::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Collaboration {
    Table,
    Id,
    RequesterCompanyId,
    TargetCompanyId,
    Status,
    Message,
    IsActive,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum Company { Table, Id }
