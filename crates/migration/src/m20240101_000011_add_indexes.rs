use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const INDEXES: &[&str] = &[
    "idx_company_email",
    "idx_offering_company",
    "idx_collaboration_requester",
    "idx_collaboration_target",
    "idx_message_collaboration",
    "idx_event_date",
    "idx_participant_event_company",
    "idx_activity_session",
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Company: lookup by email on every authenticated request
        manager
            .create_index(Index::create().name("idx_company_email").table(Company::Table).col(Company::Email).to_owned())
            .await?;
        manager
            .create_index(Index::create().name("idx_offering_company").table(Offering::Table).col(Offering::CompanyId).to_owned())
            .await?;

        // Collaboration: sent/received listings
        manager
            .create_index(
                Index::create()
                    .name("idx_collaboration_requester")
                    .table(Collaboration::Table)
                    .col(Collaboration::RequesterCompanyId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_collaboration_target")
                    .table(Collaboration::Table)
                    .col(Collaboration::TargetCompanyId)
                    .to_owned(),
            )
            .await?;

        // Message: thread listing and unread count
        manager
            .create_index(
                Index::create()
                    .name("idx_message_collaboration")
                    .table(Message::Table)
                    .col(Message::CollaborationId)
                    .col(Message::IsRead)
                    .to_owned(),
            )
            .await?;

        // Event: upcoming/past filters
        manager
            .create_index(Index::create().name("idx_event_date").table(Event::Table).col(Event::EventDate).to_owned())
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_participant_event_company")
                    .table(EventParticipant::Table)
                    .col(EventParticipant::EventId)
                    .col(EventParticipant::CompanyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_activity_session")
                    .table(UserActivity::Table)
                    .col(UserActivity::SessionId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in INDEXES {
            manager.drop_index(Index::drop().name(*name).to_owned()).await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Company { Table, Email }

#[derive(DeriveIden)]
enum Offering { Table, CompanyId }

#[derive(DeriveIden)]
enum Collaboration { Table, RequesterCompanyId, TargetCompanyId }

#[derive(DeriveIden)]
enum Message { Table, CollaborationId, IsRead }

#[derive(DeriveIden)]
enum Event { Table, EventDate }

#[derive(DeriveIden)]
enum EventParticipant { Table, EventId, CompanyId }

#[derive(DeriveIden)]
enum UserActivity { Table, SessionId }
