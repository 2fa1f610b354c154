use chrono::Utc;
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

use crate::company;
use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "event")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub event_name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub event_description: Option<String>,
    pub event_date: DateTimeWithTimeZone,
    pub location: Option<String>,
    pub organizer_company_id: i64,
    pub organizer: String,
    pub max_participants: Option<i32>,
    pub event_type: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Organizer,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Organizer => Entity::belongs_to(company::Entity).from(Column::OrganizerCompanyId).to(company::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Editable event fields.
#[derive(Debug, Clone)]
pub struct EventFields {
    pub event_name: String,
    pub event_description: Option<String>,
    pub event_date: DateTimeWithTimeZone,
    pub location: Option<String>,
    pub max_participants: Option<i32>,
    pub event_type: Option<String>,
}

impl EventFields {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.event_name.trim().is_empty() {
            return Err(ModelError::Validation("Event name is required".into()));
        }
        if self.event_name.chars().count() > 255 {
            return Err(ModelError::Validation("Event name must not exceed 255 characters".into()));
        }
        if matches!(self.max_participants, Some(n) if n < 1) {
            return Err(ModelError::Validation("Max participants must be at least 1".into()));
        }
        Ok(())
    }
}

pub async fn create<C: ConnectionTrait>(db: &C, organizer: &company::Model, fields: EventFields) -> Result<Model, ModelError> {
    fields.validate()?;
    let now = Utc::now().into();
    let am = ActiveModel {
        event_name: Set(fields.event_name.trim().to_string()),
        event_description: Set(fields.event_description),
        event_date: Set(fields.event_date),
        location: Set(fields.location),
        organizer_company_id: Set(organizer.id),
        organizer: Set(organizer.company_name.clone()),
        max_participants: Set(fields.max_participants),
        event_type: Set(fields.event_type),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
        ..Default::default()
    };
    let created = am.insert(db).await?;
    Ok(created)
}

pub async fn update<C: ConnectionTrait>(db: &C, event: Model, fields: EventFields) -> Result<Model, ModelError> {
    fields.validate()?;
    let mut am: ActiveModel = event.into();
    am.event_name = Set(fields.event_name.trim().to_string());
    am.event_description = Set(fields.event_description);
    am.event_date = Set(fields.event_date);
    am.location = Set(fields.location);
    am.max_participants = Set(fields.max_participants);
    am.event_type = Set(fields.event_type);
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await?;
    Ok(updated)
}

pub async fn soft_delete<C: ConnectionTrait>(db: &C, event: Model) -> Result<Model, ModelError> {
    let now = Utc::now().into();
    let mut am: ActiveModel = event.into();
    am.is_active = Set(false);
    am.deleted_at = Set(Some(now));
    am.updated_at = Set(now);
    let updated = am.update(db).await?;
    Ok(updated)
}
