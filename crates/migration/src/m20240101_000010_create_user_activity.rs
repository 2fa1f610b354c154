//! Create `user_activity` analytics log. Append-only, no foreign keys.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserActivity::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserActivity::Id).big_integer().not_null().auto_increment().primary_key())
                    .col(string_len_null(UserActivity::SessionId, 128))
                    .col(string_len_null(UserActivity::UserEmail, 255))
                    .col(string_len(UserActivity::ActivityType, 64))
                    .col(string_len_null(UserActivity::PageUrl, 1000))
                    .col(string_len_null(UserActivity::SearchQuery, 500))
                    .col(string_len_null(UserActivity::ResourceId, 128))
                    .col(string_len_null(UserActivity::ResourceType, 64))
                    .col(string_len_null(UserActivity::IpAddress, 64))
                    .col(text_null(UserActivity::UserAgent))
                    .col(string_len_null(UserActivity::DeviceType, 32))
                    .col(string_len_null(UserActivity::Browser, 32))
                    .col(string_len_null(UserActivity::OperatingSystem, 32))
                    .col(string_len_null(UserActivity::ReferrerUrl, 1000))
                    .col(string_len_null(UserActivity::Country, 64))
                    .col(string_len_null(UserActivity::City, 128))
                    .col(text_null(UserActivity::Metadata))
                    .col(timestamp_with_time_zone(UserActivity::CreatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(UserActivity::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum UserActivity {
    Table,
    Id,
    SessionId,
    UserEmail,
    ActivityType,
    PageUrl,
    SearchQuery,
    ResourceId,
    ResourceType,
    IpAddress,
    UserAgent,
    DeviceType,
    Browser,
    OperatingSystem,
    ReferrerUrl,
    Country,
    City,
    Metadata,
    CreatedAt,
}
