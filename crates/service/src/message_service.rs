use std::collections::HashMap;

use sea_orm::{
    prelude::DateTimeWithTimeZone, sea_query::Condition, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QuerySelect,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use models::collaboration::{self, CollaborationStatus};
use models::{company, message};
use crate::company_service::current_company;
use crate::errors::ServiceError;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRequest {
    pub collaboration_id: Option<i64>,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub message_id: i64,
    pub collaboration_id: i64,
    pub content: String,
    pub sender_company_name: String,
    pub sender_company_id: i64,
    pub is_read: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCount {
    pub unread_count: u64,
}

async fn to_responses(db: &DatabaseConnection, rows: Vec<message::Model>) -> Result<Vec<MessageResponse>, ServiceError> {
    let mut ids: Vec<i64> = rows.iter().map(|m| m.sender_company_id).collect();
    ids.sort_unstable();
    ids.dedup();
    let names: HashMap<i64, String> = company::find_by_ids(db, ids)
        .await?
        .into_iter()
        .map(|c| (c.id, c.company_name))
        .collect();
    Ok(rows
        .into_iter()
        .map(|m| MessageResponse {
            sender_company_name: names.get(&m.sender_company_id).cloned().unwrap_or_default(),
            message_id: m.id,
            collaboration_id: m.collaboration_id,
            content: m.content,
            sender_company_id: m.sender_company_id,
            is_read: m.is_read,
            created_at: m.created_at,
        })
        .collect())
}

/// Only parties of an ACCEPTED collaboration may write to it.
#[instrument(skip(db, req))]
pub async fn send_message(db: &DatabaseConnection, actor_email: &str, req: MessageRequest) -> Result<MessageResponse, ServiceError> {
    let sender = current_company(db, actor_email).await?;
    let collaboration_id = req
        .collaboration_id
        .ok_or_else(|| ServiceError::Validation("Collaboration id is required".into()))?;
    message::validate_content(&req.content)?;
    let collab = collaboration::Entity::find_by_id(collaboration_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Collaboration"))?;
    if !collab.involves(sender.id) {
        return Err(ServiceError::Forbidden("You are not authorized to send messages in this collaboration".into()));
    }
    if collab.status != CollaborationStatus::Accepted {
        return Err(ServiceError::InvalidState("Messages can only be sent in accepted collaborations".into()));
    }
    let created = message::create(db, collab.id, sender.id, req.content.trim()).await?;
    info!(message_id = created.id, collaboration_id = collab.id, sender = sender.id, "message_sent");
    Ok(MessageResponse {
        message_id: created.id,
        collaboration_id: created.collaboration_id,
        content: created.content,
        sender_company_name: sender.company_name,
        sender_company_id: sender.id,
        is_read: created.is_read,
        created_at: created.created_at,
    })
}

pub async fn get_messages(db: &DatabaseConnection, actor_email: &str, collaboration_id: i64) -> Result<Vec<MessageResponse>, ServiceError> {
    let me = current_company(db, actor_email).await?;
    let collab = collaboration::Entity::find_by_id(collaboration_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Collaboration"))?;
    if !collab.involves(me.id) {
        return Err(ServiceError::Forbidden("You are not authorized to view messages in this collaboration".into()));
    }
    let rows = message::active_in_collaboration(db, collab.id).await?;
    to_responses(db, rows).await
}

#[instrument(skip(db))]
pub async fn mark_as_read(db: &DatabaseConnection, actor_email: &str, message_id: i64) -> Result<MessageResponse, ServiceError> {
    let me = current_company(db, actor_email).await?;
    let found = message::Entity::find_by_id(message_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Message"))?;
    let collab = collaboration::Entity::find_by_id(found.collaboration_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Collaboration"))?;
    if !collab.involves(me.id) {
        return Err(ServiceError::Forbidden("You are not authorized to view messages in this collaboration".into()));
    }
    let updated = message::mark_read(db, found).await?;
    let mut out = to_responses(db, vec![updated]).await?;
    out.pop().ok_or_else(|| ServiceError::not_found("Message"))
}

/// Unread messages from the other party across the actor's active collaborations.
pub async fn get_unread_message_count(db: &DatabaseConnection, actor_email: &str) -> Result<UnreadCount, ServiceError> {
    let me = current_company(db, actor_email).await?;
    let collaboration_ids: Vec<i64> = collaboration::Entity::find()
        .select_only()
        .column(collaboration::Column::Id)
        .filter(collaboration::Column::IsActive.eq(true))
        .filter(
            Condition::any()
                .add(collaboration::Column::RequesterCompanyId.eq(me.id))
                .add(collaboration::Column::TargetCompanyId.eq(me.id)),
        )
        .into_tuple()
        .all(db)
        .await?;
    if collaboration_ids.is_empty() {
        return Ok(UnreadCount { unread_count: 0 });
    }
    let unread_count = message::Entity::find()
        .filter(message::Column::CollaborationId.is_in(collaboration_ids))
        .filter(message::Column::IsActive.eq(true))
        .filter(message::Column::IsRead.eq(false))
        .filter(message::Column::SenderCompanyId.ne(me.id))
        .count(db)
        .await?;
    Ok(UnreadCount { unread_count })
}
