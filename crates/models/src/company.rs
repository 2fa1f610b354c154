use std::str::FromStr;

use chrono::Utc;
use sea_orm::{entity::prelude::*, ConnectionTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::{offering, social_link};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompanyType {
    #[sea_orm(string_value = "STARTUP")]
    Startup,
    #[sea_orm(string_value = "SERVICE_PROVIDER")]
    ServiceProvider,
}

impl FromStr for CompanyType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "STARTUP" => Ok(CompanyType::Startup),
            "SERVICE_PROVIDER" => Ok(CompanyType::ServiceProvider),
            _ => Err(ModelError::Validation("Company type must be STARTUP or SERVICE_PROVIDER".into())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "company")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub email: String,
    pub company_name: String,
    pub description: Option<String>,
    pub company_type: CompanyType,
    pub city: Option<String>,
    pub phone_number: Option<String>,
    pub logo_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Offering,
    SocialLink,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Offering => Entity::has_many(offering::Entity).into(),
            Relation::SocialLink => Entity::has_one(social_link::Entity).into(),
        }
    }
}

impl Related<offering::Entity> for Entity {
    fn to() -> RelationDef { Relation::Offering.def() }
}

impl Related<social_link::Entity> for Entity {
    fn to() -> RelationDef { Relation::SocialLink.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Fields accepted when registering a company.
#[derive(Debug, Clone)]
pub struct NewCompany {
    pub email: String,
    pub company_name: String,
    pub description: Option<String>,
    pub company_type: CompanyType,
    pub city: Option<String>,
    pub phone_number: Option<String>,
    pub logo_url: Option<String>,
}

/// Emails are compared trimmed and lower-cased everywhere.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    let email = email.trim();
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.'),
        None => false,
    };
    if !valid || email.len() > 255 || email.contains(char::is_whitespace) {
        return Err(ModelError::Validation("Invalid email format".into()));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() { return Err(ModelError::Validation("Company name is required".into())); }
    if name.chars().count() > 255 { return Err(ModelError::Validation("Company name must not exceed 255 characters".into())); }
    Ok(())
}

pub fn validate_description(description: Option<&str>) -> Result<(), ModelError> {
    if description.map(|d| d.chars().count() > 150).unwrap_or(false) {
        return Err(ModelError::Validation("Description must not exceed 150 characters".into()));
    }
    Ok(())
}

/// Exactly ten ASCII digits when present.
pub fn validate_phone(phone: Option<&str>) -> Result<(), ModelError> {
    match phone {
        Some(p) if p.len() != 10 || !p.chars().all(|c| c.is_ascii_digit()) => {
            Err(ModelError::Validation("Phone number must be 10 digits".into()))
        }
        _ => Ok(()),
    }
}

pub async fn find_active_by_email<C: ConnectionTrait>(db: &C, email: &str) -> Result<Option<Model>, ModelError> {
    let found = Entity::find()
        .filter(Column::Email.eq(normalize_email(email)))
        .filter(Column::IsActive.eq(true))
        .one(db)
        .await?;
    Ok(found)
}

pub async fn find_active_by_id<C: ConnectionTrait>(db: &C, id: i64) -> Result<Option<Model>, ModelError> {
    let found = Entity::find_by_id(id).filter(Column::IsActive.eq(true)).one(db).await?;
    Ok(found)
}

pub async fn find_by_ids<C: ConnectionTrait>(db: &C, ids: Vec<i64>) -> Result<Vec<Model>, ModelError> {
    if ids.is_empty() { return Ok(vec![]); }
    let found = Entity::find().filter(Column::Id.is_in(ids)).all(db).await?;
    Ok(found)
}

pub async fn create<C: ConnectionTrait>(db: &C, input: NewCompany) -> Result<Model, ModelError> {
    validate_email(&input.email)?;
    validate_name(&input.company_name)?;
    validate_description(input.description.as_deref())?;
    validate_phone(input.phone_number.as_deref())?;
    let now = Utc::now().into();
    let am = ActiveModel {
        email: Set(normalize_email(&input.email)),
        company_name: Set(input.company_name.trim().to_string()),
        description: Set(input.description),
        company_type: Set(input.company_type),
        city: Set(input.city),
        phone_number: Set(input.phone_number),
        logo_url: Set(input.logo_url),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
        ..Default::default()
    };
    let created = am.insert(db).await?;
    Ok(created)
}

pub async fn soft_delete<C: ConnectionTrait>(db: &C, company: Model) -> Result<Model, ModelError> {
    let now = Utc::now().into();
    let mut am: ActiveModel = company.into();
    am.is_active = Set(false);
    am.deleted_at = Set(Some(now));
    am.updated_at = Set(now);
    let updated = am.update(db).await?;
    Ok(updated)
}
