use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{entity::prelude::*, ConnectionTrait, PaginatorTrait, QueryFilter, QuerySelect, Set};
use sea_orm::sea_query::Expr;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::{company, event};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParticipantStatus {
    #[sea_orm(string_value = "REGISTERED")]
    Registered,
    #[sea_orm(string_value = "ATTENDED")]
    Attended,
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "event_participant")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub event_id: i64,
    pub company_id: i64,
    pub status: ParticipantStatus,
    pub registration_date: DateTimeWithTimeZone,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Event,
    Company,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Event => Entity::belongs_to(event::Entity).from(Column::EventId).to(event::Column::Id).into(),
            Relation::Company => Entity::belongs_to(company::Entity).from(Column::CompanyId).to(company::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Active REGISTERED rows for an event.
pub async fn count_registered<C: ConnectionTrait>(db: &C, event_id: i64) -> Result<u64, ModelError> {
    let n = Entity::find()
        .filter(Column::EventId.eq(event_id))
        .filter(Column::Status.eq(ParticipantStatus::Registered))
        .filter(Column::IsActive.eq(true))
        .count(db)
        .await?;
    Ok(n)
}

/// Active REGISTERED counts for many events in one grouped query.
/// Events without registrations are absent from the map.
pub async fn count_registered_by_event<C: ConnectionTrait>(db: &C, event_ids: Vec<i64>) -> Result<HashMap<i64, u64>, ModelError> {
    if event_ids.is_empty() { return Ok(HashMap::new()); }
    let rows: Vec<(i64, i64)> = Entity::find()
        .select_only()
        .column(Column::EventId)
        .column_as(Expr::col(Column::Id).count(), "registered")
        .filter(Column::EventId.is_in(event_ids))
        .filter(Column::Status.eq(ParticipantStatus::Registered))
        .filter(Column::IsActive.eq(true))
        .group_by(Column::EventId)
        .into_tuple()
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|(event_id, n)| (event_id, n.max(0) as u64)).collect())
}

pub async fn find_active<C: ConnectionTrait>(db: &C, event_id: i64, company_id: i64) -> Result<Option<Model>, ModelError> {
    let found = Entity::find()
        .filter(Column::EventId.eq(event_id))
        .filter(Column::CompanyId.eq(company_id))
        .filter(Column::IsActive.eq(true))
        .one(db)
        .await?;
    Ok(found)
}

/// Event ids among `event_ids` the company holds an active registration for.
pub async fn registered_event_ids<C: ConnectionTrait>(db: &C, company_id: i64, event_ids: Vec<i64>) -> Result<Vec<i64>, ModelError> {
    if event_ids.is_empty() { return Ok(vec![]); }
    let rows = Entity::find()
        .filter(Column::CompanyId.eq(company_id))
        .filter(Column::EventId.is_in(event_ids))
        .filter(Column::Status.eq(ParticipantStatus::Registered))
        .filter(Column::IsActive.eq(true))
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|r| r.event_id).collect())
}

pub async fn register<C: ConnectionTrait>(db: &C, event_id: i64, company_id: i64) -> Result<Model, ModelError> {
    let am = ActiveModel {
        event_id: Set(event_id),
        company_id: Set(company_id),
        status: Set(ParticipantStatus::Registered),
        registration_date: Set(Utc::now().into()),
        is_active: Set(true),
        ..Default::default()
    };
    let created = am.insert(db).await?;
    Ok(created)
}

pub async fn cancel<C: ConnectionTrait>(db: &C, participant: Model) -> Result<Model, ModelError> {
    let mut am: ActiveModel = participant.into();
    am.status = Set(ParticipantStatus::Cancelled);
    am.is_active = Set(false);
    let updated = am.update(db).await?;
    Ok(updated)
}
