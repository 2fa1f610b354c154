use std::str::FromStr;

use chrono::Utc;
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

use crate::company::{normalize_email, validate_email, validate_phone};
use crate::errors::ModelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnquiryStatus {
    #[sea_orm(string_value = "NEW")]
    New,
    #[sea_orm(string_value = "IN_PROGRESS")]
    InProgress,
    #[sea_orm(string_value = "RESOLVED")]
    Resolved,
    #[sea_orm(string_value = "CLOSED")]
    Closed,
}

impl FromStr for EnquiryStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NEW" => Ok(EnquiryStatus::New),
            "IN_PROGRESS" => Ok(EnquiryStatus::InProgress),
            "RESOLVED" => Ok(EnquiryStatus::Resolved),
            "CLOSED" => Ok(EnquiryStatus::Closed),
            other => Err(ModelError::Validation(format!("Invalid enquiry status: {}", other))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "enquiry")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    pub status: EnquiryStatus,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { panic!("no relations defined here") }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create<C: ConnectionTrait>(db: &C, name: &str, email: &str, phone: Option<String>, message: &str) -> Result<Model, ModelError> {
    if name.trim().is_empty() { return Err(ModelError::Validation("Name is required".into())); }
    validate_email(email)?;
    validate_phone(phone.as_deref())?;
    if message.trim().is_empty() { return Err(ModelError::Validation("Message is required".into())); }
    let now = Utc::now().into();
    let am = ActiveModel {
        name: Set(name.trim().to_string()),
        email: Set(normalize_email(email)),
        phone: Set(phone),
        message: Set(message.to_string()),
        status: Set(EnquiryStatus::New),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
        ..Default::default()
    };
    let created = am.insert(db).await?;
    Ok(created)
}

pub async fn set_status<C: ConnectionTrait>(db: &C, enquiry: Model, status: EnquiryStatus) -> Result<Model, ModelError> {
    let mut am: ActiveModel = enquiry.into();
    am.status = Set(status);
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await?;
    Ok(updated)
}

pub async fn soft_delete<C: ConnectionTrait>(db: &C, enquiry: Model) -> Result<Model, ModelError> {
    let now = Utc::now().into();
    let mut am: ActiveModel = enquiry.into();
    am.is_active = Set(false);
    am.deleted_at = Set(Some(now));
    am.updated_at = Set(now);
    let updated = am.update(db).await?;
    Ok(updated)
}
