//! Create `event` table organised by a company.
//!
//! `organizer` keeps the organiser's company name as it was at creation.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Event::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Event::Id).big_integer().not_null().auto_increment().primary_key())
                    .col(string_len(Event::EventName, 255))
                    .col(text_null(Event::EventDescription))
                    .col(timestamp_with_time_zone(Event::EventDate))
                    .col(string_len_null(Event::Location, 255))
                    .col(big_integer(Event::OrganizerCompanyId))
                    .col(string_len(Event::Organizer, 255))
                    .col(integer_null(Event::MaxParticipants))
                    .col(string_len_null(Event::EventType, 64))
                    .col(boolean(Event::IsActive).default(true))
                    .col(timestamp_with_time_zone(Event::CreatedAt))
                    .col(timestamp_with_time_zone(Event::UpdatedAt))
                    .col(timestamp_with_time_zone_null(Event::DeletedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_organizer")
                            .from(Event::Table, Event::OrganizerCompanyId)
                            .to(Company::Table, Company::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Event::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Event {
    Table,
    Id,
    EventName,
    EventDescription,
    EventDate,
    Location,
    OrganizerCompanyId,
    Organizer,
    MaxParticipants,
    EventType,
    IsActive,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum Company { Table, Id }
