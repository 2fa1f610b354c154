//! Create `social_link` table; at most one row per company.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SocialLink::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SocialLink::Id).big_integer().not_null().auto_increment().primary_key())
                    .col(big_integer(SocialLink::CompanyId).unique_key())
                    .col(string_len_null(SocialLink::Website, 500))
                    .col(string_len_null(SocialLink::Linkedin, 500))
                    .col(string_len_null(SocialLink::Facebook, 500))
                    .col(string_len_null(SocialLink::Instagram, 500))
                    .col(string_len_null(SocialLink::Twitter, 500))
                    .col(boolean(SocialLink::IsActive).default(true))
                    .col(timestamp_with_time_zone(SocialLink::CreatedAt))
                    .col(timestamp_with_time_zone(SocialLink::UpdatedAt))
                    .col(timestamp_with_time_zone_null(SocialLink::DeletedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_social_link_company")
                            .from(SocialLink::Table, SocialLink::CompanyId)
                            .to(Company::Table, Company::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(SocialLink::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum SocialLink {
    Table,
    Id,
    CompanyId,
    Website,
    Linkedin,
    Facebook,
    Instagram,
    Twitter,
    IsActive,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum Company { Table, Id }
