//! Create `event_participant` table linking companies to events.
//!
//! No unique (event, company) constraint: a cancelled registration stays as
//! an inactive row and a new registration inserts a fresh one.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EventParticipant::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(EventParticipant::Id).big_integer().not_null().auto_increment().primary_key())
                    .col(big_integer(EventParticipant::EventId))
                    .col(big_integer(EventParticipant::CompanyId))
                    .col(string_len(EventParticipant::Status, 32))
                    .col(timestamp_with_time_zone(EventParticipant::RegistrationDate))
                    .col(boolean(EventParticipant::IsActive).default(true))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_participant_event")
                            .from(EventParticipant::Table, EventParticipant::EventId)
                            .to(Event::Table, Event::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_participant_company")
                            .from(EventParticipant::Table, EventParticipant::CompanyId)
                            .to(Company::Table, Company::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(EventParticipant::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum EventParticipant { Table, Id, EventId, CompanyId, Status, RegistrationDate, IsActive }

#[derive(DeriveIden)]
enum Event { Table, Id }

#[derive(DeriveIden)]
enum Company { Table, Id }
