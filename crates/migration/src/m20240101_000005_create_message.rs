//! Create `message` table with FKs to `collaboration` and sender `company`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Message::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Message::Id).big_integer().not_null().auto_increment().primary_key())
                    .col(big_integer(Message::CollaborationId))
                    .col(big_integer(Message::SenderCompanyId))
                    .col(text(Message::Content))
                    .col(boolean(Message::IsRead).default(false))
                    .col(boolean(Message::IsActive).default(true))
                    .col(timestamp_with_time_zone(Message::CreatedAt))
                    .col(timestamp_with_time_zone_null(Message::DeletedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_message_collaboration")
                            .from(Message::Table, Message::CollaborationId)
                            .to(Collaboration::Table, Collaboration::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_message_sender")
                            .from(Message::Table, Message::SenderCompanyId)
                            .to(Company::Table, Company::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Message::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Message { Table, Id, CollaborationId, SenderCompanyId, Content, IsRead, IsActive, CreatedAt, DeletedAt }

#[derive(DeriveIden)]
enum Collaboration { Table, Id }

#[derive(DeriveIden)]
enum Company { Table, Id }
