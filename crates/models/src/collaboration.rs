//! Collaboration between a requester and a target company.
//!
//! Status moves PENDING -> ACCEPTED | REJECTED. `CANCELLED` is part of the
//! stored vocabulary but no operation produces it. Soft deletion is a
//! separate visibility flag and does not touch the status.
use chrono::Utc;
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

use crate::company;
use crate::errors::ModelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CollaborationStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "ACCEPTED")]
    Accepted,
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "collaboration")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub requester_company_id: i64,
    pub target_company_id: i64,
    pub status: CollaborationStatus,
    pub message: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Requester,
    Target,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Requester => Entity::belongs_to(company::Entity).from(Column::RequesterCompanyId).to(company::Column::Id).into(),
            Relation::Target => Entity::belongs_to(company::Entity).from(Column::TargetCompanyId).to(company::Column::Id).into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Why a guarded transition was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionDenied {
    NotTarget,
    NotPending(CollaborationStatus),
}

impl Model {
    /// True when `company_id` is the requester or the target.
    pub fn involves(&self, company_id: i64) -> bool {
        self.requester_company_id == company_id || self.target_company_id == company_id
    }

    /// Guarded responder check: only the target may respond, and only once.
    pub fn check_response(&self, responder_company_id: Option<i64>) -> Result<(), TransitionDenied> {
        if responder_company_id != Some(self.target_company_id) {
            return Err(TransitionDenied::NotTarget);
        }
        if self.status != CollaborationStatus::Pending {
            return Err(TransitionDenied::NotPending(self.status));
        }
        Ok(())
    }
}

pub fn validate_message(message: Option<&str>) -> Result<(), ModelError> {
    if message.map(|m| m.chars().count() > 1000).unwrap_or(false) {
        return Err(ModelError::Validation("Message must not exceed 1000 characters".into()));
    }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(db: &C, requester_id: i64, target_id: i64, message: Option<String>) -> Result<Model, ModelError> {
    if requester_id == target_id {
        return Err(ModelError::Validation("Cannot send collaboration request to your own company".into()));
    }
    validate_message(message.as_deref())?;
    let now = Utc::now().into();
    let am = ActiveModel {
        requester_company_id: Set(requester_id),
        target_company_id: Set(target_id),
        status: Set(CollaborationStatus::Pending),
        message: Set(message),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
        ..Default::default()
    };
    let created = am.insert(db).await?;
    Ok(created)
}

/// Overwrite the status. Callers decide whether the move is allowed.
pub async fn set_status<C: ConnectionTrait>(db: &C, collaboration: Model, status: CollaborationStatus) -> Result<Model, ModelError> {
    let mut am: ActiveModel = collaboration.into();
    am.status = Set(status);
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await?;
    Ok(updated)
}

pub async fn soft_delete<C: ConnectionTrait>(db: &C, collaboration: Model) -> Result<Model, ModelError> {
    let now = Utc::now().into();
    let mut am: ActiveModel = collaboration.into();
    am.is_active = Set(false);
    am.deleted_at = Set(Some(now));
    am.updated_at = Set(now);
    let updated = am.update(db).await?;
    Ok(updated)
}
