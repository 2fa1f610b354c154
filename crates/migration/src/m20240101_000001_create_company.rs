//! Create `company` table.
//!
//! A company is the authenticated identity, keyed by email. Email uniqueness
//! is enforced among active rows by the service layer so a soft-deleted
//! company does not block re-registration.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Company::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Company::Id).big_integer().not_null().auto_increment().primary_key())
                    .col(string_len(Company::Email, 255))
                    .col(string_len(Company::CompanyName, 255))
                    .col(string_len_null(Company::Description, 150))
                    .col(string_len(Company::CompanyType, 32))
                    .col(string_len_null(Company::City, 128))
                    .col(string_len_null(Company::PhoneNumber, 10))
                    .col(string_len_null(Company::LogoUrl, 500))
                    .col(boolean(Company::IsActive).default(true))
                    .col(timestamp_with_time_zone(Company::CreatedAt))
                    .col(timestamp_with_time_zone(Company::UpdatedAt))
                    .col(timestamp_with_time_zone_null(Company::DeletedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Company::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Company {
    Table,
    Id,
    Email,
    CompanyName,
    Description,
    CompanyType,
    City,
    PhoneNumber,
    LogoUrl,
    IsActive,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
