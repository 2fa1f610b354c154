//! Create `offering` table with FK to `company`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Offering::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Offering::Id).big_integer().not_null().auto_increment().primary_key())
                    .col(big_integer(Offering::CompanyId))
                    .col(string_len(Offering::OfferingName, 255))
                    .col(boolean(Offering::IsActive).default(true))
                    .col(timestamp_with_time_zone(Offering::CreatedAt))
                    .col(timestamp_with_time_zone_null(Offering::DeletedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_offering_company")
                            .from(Offering::Table, Offering::CompanyId)
                            .to(Company::Table, Company::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Offering::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Offering { Table, Id, CompanyId, OfferingName, IsActive, CreatedAt, DeletedAt }

#[derive(DeriveIden)]
enum Company { Table, Id }
