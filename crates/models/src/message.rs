use chrono::Utc;
use sea_orm::{entity::prelude::*, ConnectionTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::{collaboration, company};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "message")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub collaboration_id: i64,
    pub sender_company_id: i64,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub is_read: bool,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Collaboration,
    Sender,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Collaboration => Entity::belongs_to(collaboration::Entity).from(Column::CollaborationId).to(collaboration::Column::Id).into(),
            Relation::Sender => Entity::belongs_to(company::Entity).from(Column::SenderCompanyId).to(company::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_content(content: &str) -> Result<(), ModelError> {
    if content.trim().is_empty() {
        return Err(ModelError::Validation("Message content is required".into()));
    }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(db: &C, collaboration_id: i64, sender_company_id: i64, content: &str) -> Result<Model, ModelError> {
    validate_content(content)?;
    let am = ActiveModel {
        collaboration_id: Set(collaboration_id),
        sender_company_id: Set(sender_company_id),
        content: Set(content.to_string()),
        is_read: Set(false),
        is_active: Set(true),
        created_at: Set(Utc::now().into()),
        deleted_at: Set(None),
        ..Default::default()
    };
    let created = am.insert(db).await?;
    Ok(created)
}

/// Active messages of a collaboration in send order.
pub async fn active_in_collaboration<C: ConnectionTrait>(db: &C, collaboration_id: i64) -> Result<Vec<Model>, ModelError> {
    let found = Entity::find()
        .filter(Column::CollaborationId.eq(collaboration_id))
        .filter(Column::IsActive.eq(true))
        .order_by_asc(Column::CreatedAt)
        .order_by_asc(Column::Id)
        .all(db)
        .await?;
    Ok(found)
}

pub async fn mark_read<C: ConnectionTrait>(db: &C, message: Model) -> Result<Model, ModelError> {
    if message.is_read { return Ok(message); }
    let mut am: ActiveModel = message.into();
    am.is_read = Set(true);
    let updated = am.update(db).await?;
    Ok(updated)
}
