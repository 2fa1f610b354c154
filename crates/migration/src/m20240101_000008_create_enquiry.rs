//! Create `enquiry` table for public contact-form submissions.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Enquiry::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Enquiry::Id).big_integer().not_null().auto_increment().primary_key())
                    .col(string_len(Enquiry::Name, 255))
                    .col(string_len(Enquiry::Email, 255))
                    .col(string_len_null(Enquiry::Phone, 10))
                    .col(text(Enquiry::Message))
                    .col(string_len(Enquiry::Status, 32))
                    .col(boolean(Enquiry::IsActive).default(true))
                    .col(timestamp_with_time_zone(Enquiry::CreatedAt))
                    .col(timestamp_with_time_zone(Enquiry::UpdatedAt))
                    .col(timestamp_with_time_zone_null(Enquiry::DeletedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Enquiry::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Enquiry { Table, Id, Name, Email, Phone, Message, Status, IsActive, CreatedAt, UpdatedAt, DeletedAt }
