//! Create `city` lookup table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(City::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(City::Id).big_integer().not_null().auto_increment().primary_key())
                    .col(string_len(City::CityName, 128).unique_key())
                    .col(boolean(City::IsActive).default(true))
                    .col(timestamp_with_time_zone(City::CreatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(City::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum City { Table, Id, CityName, IsActive, CreatedAt }
