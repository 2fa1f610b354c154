//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_company;
mod m20240101_000002_create_offering;
mod m20240101_000003_create_social_link;
mod m20240101_000004_create_collaboration;
mod m20240101_000005_create_message;
mod m20240101_000006_create_event;
mod m20240101_000007_create_event_participant;
mod m20240101_000008_create_enquiry;
mod m20240101_000009_create_city;
mod m20240101_000010_create_user_activity;
mod m20240101_000011_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_company::Migration),
            Box::new(m20240101_000002_create_offering::Migration),
            Box::new(m20240101_000003_create_social_link::Migration),
            Box::new(m20240101_000004_create_collaboration::Migration),
            Box::new(m20240101_000005_create_message::Migration),
            Box::new(m20240101_000006_create_event::Migration),
            Box::new(m20240101_000007_create_event_participant::Migration),
            Box::new(m20240101_000008_create_enquiry::Migration),
            Box::new(m20240101_000009_create_city::Migration),
            Box::new(m20240101_000010_create_user_activity::Migration),
            // Indexes should always be applied last
            Box::new(m20240101_000011_add_indexes::Migration),
        ]
    }
}
