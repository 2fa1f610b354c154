use std::collections::{HashMap, HashSet};

use chrono::Utc;
use sea_orm::{
    prelude::DateTimeWithTimeZone, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Select,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use models::event::{self, EventFields};
use models::{company, event_participant};
use crate::company_service::current_company;
use crate::errors::ServiceError;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    #[serde(default)]
    pub event_name: String,
    pub event_description: Option<String>,
    pub event_date: Option<DateTimeWithTimeZone>,
    pub location: Option<String>,
    pub max_participants: Option<i32>,
    pub event_type: Option<String>,
}

impl EventRequest {
    fn into_fields(self) -> Result<EventFields, ServiceError> {
        let event_date = self
            .event_date
            .ok_or_else(|| ServiceError::Validation("Event date is required".into()))?;
        let fields = EventFields {
            event_name: self.event_name,
            event_description: self.event_description,
            event_date,
            location: self.location,
            max_participants: self.max_participants,
            event_type: self.event_type,
        };
        fields.validate()?;
        Ok(fields)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub event_id: i64,
    pub event_name: String,
    pub event_description: Option<String>,
    pub event_date: DateTimeWithTimeZone,
    pub location: Option<String>,
    pub organizer_name: String,
    pub organizer_email: String,
    pub max_participants: Option<i32>,
    pub registered_participants: u64,
    pub event_type: Option<String>,
    pub is_registered: bool,
    pub created_at: DateTimeWithTimeZone,
}

/// Resolve an optional viewer email to an active company id.
async fn viewer_company(db: &DatabaseConnection, viewer: Option<&str>) -> Result<Option<i64>, ServiceError> {
    match viewer {
        Some(email) => Ok(company::find_active_by_email(db, email).await?.map(|c| c.id)),
        None => Ok(None),
    }
}

async fn to_responses(db: &DatabaseConnection, rows: Vec<event::Model>, viewer: Option<i64>) -> Result<Vec<EventResponse>, ServiceError> {
    let event_ids: Vec<i64> = rows.iter().map(|e| e.id).collect();
    let mut organizer_ids: Vec<i64> = rows.iter().map(|e| e.organizer_company_id).collect();
    organizer_ids.sort_unstable();
    organizer_ids.dedup();
    let emails: HashMap<i64, String> = company::find_by_ids(db, organizer_ids)
        .await?
        .into_iter()
        .map(|c| (c.id, c.email))
        .collect();
    let counts = event_participant::count_registered_by_event(db, event_ids.clone()).await?;
    let registered: HashSet<i64> = match viewer {
        Some(company_id) => event_participant::registered_event_ids(db, company_id, event_ids).await?.into_iter().collect(),
        None => HashSet::new(),
    };
    let mut out = Vec::with_capacity(rows.len());
    for e in rows {
        out.push(EventResponse {
            organizer_email: emails.get(&e.organizer_company_id).cloned().unwrap_or_default(),
            is_registered: registered.contains(&e.id),
            registered_participants: counts.get(&e.id).copied().unwrap_or(0),
            event_id: e.id,
            event_name: e.event_name,
            event_description: e.event_description,
            event_date: e.event_date,
            location: e.location,
            organizer_name: e.organizer,
            max_participants: e.max_participants,
            event_type: e.event_type,
            created_at: e.created_at,
        });
    }
    Ok(out)
}

async fn to_response(db: &DatabaseConnection, row: event::Model, viewer: Option<i64>) -> Result<EventResponse, ServiceError> {
    to_responses(db, vec![row], viewer)
        .await?
        .pop()
        .ok_or_else(|| ServiceError::not_found("Event"))
}

async fn find_event(db: &DatabaseConnection, id: i64) -> Result<event::Model, ServiceError> {
    event::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Event"))
}

fn active_events() -> Select<event::Entity> {
    event::Entity::find().filter(event::Column::IsActive.eq(true))
}

#[instrument(skip(db, req))]
pub async fn create_event(db: &DatabaseConnection, actor_email: &str, req: EventRequest) -> Result<EventResponse, ServiceError> {
    let organizer = current_company(db, actor_email).await?;
    let created = event::create(db, &organizer, req.into_fields()?).await?;
    info!(event_id = created.id, organizer = organizer.id, "event_created");
    to_response(db, created, Some(organizer.id)).await
}

#[instrument(skip(db, req))]
pub async fn update_event(db: &DatabaseConnection, actor_email: &str, id: i64, req: EventRequest) -> Result<EventResponse, ServiceError> {
    let me = current_company(db, actor_email).await?;
    let existing = find_event(db, id).await?;
    if existing.organizer_company_id != me.id {
        return Err(ServiceError::Forbidden("Unauthorized to update this event".into()));
    }
    let updated = event::update(db, existing, req.into_fields()?).await?;
    info!(event_id = id, "event_updated");
    to_response(db, updated, Some(me.id)).await
}

#[instrument(skip(db))]
pub async fn delete_event(db: &DatabaseConnection, actor_email: &str, id: i64) -> Result<(), ServiceError> {
    let me = current_company(db, actor_email).await?;
    let existing = find_event(db, id).await?;
    if existing.organizer_company_id != me.id {
        return Err(ServiceError::Forbidden("Unauthorized to delete this event".into()));
    }
    event::soft_delete(db, existing).await?;
    info!(event_id = id, "event_deleted");
    Ok(())
}

/// Active events, latest date first.
pub async fn get_all_events(db: &DatabaseConnection, viewer: Option<&str>) -> Result<Vec<EventResponse>, ServiceError> {
    let viewer = viewer_company(db, viewer).await?;
    let rows = active_events().order_by_desc(event::Column::EventDate).all(db).await?;
    to_responses(db, rows, viewer).await
}

pub async fn get_upcoming_events(db: &DatabaseConnection, viewer: Option<&str>) -> Result<Vec<EventResponse>, ServiceError> {
    let viewer = viewer_company(db, viewer).await?;
    let now: DateTimeWithTimeZone = Utc::now().into();
    let rows = active_events()
        .filter(event::Column::EventDate.gt(now))
        .order_by_asc(event::Column::EventDate)
        .all(db)
        .await?;
    to_responses(db, rows, viewer).await
}

pub async fn get_past_events(db: &DatabaseConnection, viewer: Option<&str>) -> Result<Vec<EventResponse>, ServiceError> {
    let viewer = viewer_company(db, viewer).await?;
    let now: DateTimeWithTimeZone = Utc::now().into();
    let rows = active_events()
        .filter(event::Column::EventDate.lt(now))
        .order_by_desc(event::Column::EventDate)
        .all(db)
        .await?;
    to_responses(db, rows, viewer).await
}

pub async fn get_my_events(db: &DatabaseConnection, actor_email: &str) -> Result<Vec<EventResponse>, ServiceError> {
    let me = current_company(db, actor_email).await?;
    let rows = active_events()
        .filter(event::Column::OrganizerCompanyId.eq(me.id))
        .order_by_desc(event::Column::EventDate)
        .all(db)
        .await?;
    to_responses(db, rows, Some(me.id)).await
}

/// Soft-deleted events stay addressable here.
pub async fn get_event_by_id(db: &DatabaseConnection, id: i64, viewer: Option<&str>) -> Result<EventResponse, ServiceError> {
    let viewer = viewer_company(db, viewer).await?;
    let found = find_event(db, id).await?;
    to_response(db, found, viewer).await
}

#[instrument(skip(db))]
pub async fn register_for_event(db: &DatabaseConnection, actor_email: &str, id: i64) -> Result<(), ServiceError> {
    let me = current_company(db, actor_email).await?;
    let found = find_event(db, id).await?;
    if !found.is_active {
        return Err(ServiceError::InvalidState("Event is no longer active".into()));
    }
    if event_participant::find_active(db, found.id, me.id).await?.is_some() {
        return Err(ServiceError::Conflict("Already registered for this event".into()));
    }
    if let Some(max) = found.max_participants {
        let registered = event_participant::count_registered(db, found.id).await?;
        if registered >= u64::try_from(max).unwrap_or(0) {
            return Err(ServiceError::InvalidState("Event is full".into()));
        }
    }
    event_participant::register(db, found.id, me.id).await?;
    info!(event_id = id, company_id = me.id, "event_registered");
    Ok(())
}

#[instrument(skip(db))]
pub async fn cancel_registration(db: &DatabaseConnection, actor_email: &str, id: i64) -> Result<(), ServiceError> {
    let me = current_company(db, actor_email).await?;
    let found = find_event(db, id).await?;
    let participant = event_participant::find_active(db, found.id, me.id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Registration"))?;
    event_participant::cancel(db, participant).await?;
    info!(event_id = id, company_id = me.id, "event_registration_cancelled");
    Ok(())
}
