use chrono::Utc;
use sea_orm::{entity::prelude::*, ConnectionTrait, QueryFilter, Set, TryIntoModel};
use serde::{Deserialize, Serialize};

use crate::company;
use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "social_link")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub company_id: i64,
    pub website: Option<String>,
    pub linkedin: Option<String>,
    pub facebook: Option<String>,
    pub instagram: Option<String>,
    pub twitter: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Company,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Company => Entity::belongs_to(company::Entity).from(Column::CompanyId).to(company::Column::Id).into(),
        }
    }
}

impl Related<company::Entity> for Entity {
    fn to() -> RelationDef { Relation::Company.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// The five link slots a company can fill.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
    pub website: Option<String>,
    pub linkedin: Option<String>,
    pub facebook: Option<String>,
    pub instagram: Option<String>,
    pub twitter: Option<String>,
}

impl SocialLinks {
    pub fn validate(&self) -> Result<(), ModelError> {
        let slots = [
            ("Website", &self.website),
            ("LinkedIn", &self.linkedin),
            ("Facebook", &self.facebook),
            ("Instagram", &self.instagram),
            ("Twitter", &self.twitter),
        ];
        for (label, value) in slots {
            if value.as_deref().map(|v| v.chars().count() > 500).unwrap_or(false) {
                return Err(ModelError::Validation(format!("{} URL must not exceed 500 characters", label)));
            }
        }
        Ok(())
    }
}

impl From<Model> for SocialLinks {
    fn from(m: Model) -> Self {
        Self { website: m.website, linkedin: m.linkedin, facebook: m.facebook, instagram: m.instagram, twitter: m.twitter }
    }
}

pub async fn active_for_companies<C: ConnectionTrait>(db: &C, company_ids: Vec<i64>) -> Result<Vec<Model>, ModelError> {
    if company_ids.is_empty() { return Ok(vec![]); }
    let found = Entity::find()
        .filter(Column::CompanyId.is_in(company_ids))
        .filter(Column::IsActive.eq(true))
        .all(db)
        .await?;
    Ok(found)
}

/// Insert or overwrite the single link row of a company.
pub async fn upsert_for_company<C: ConnectionTrait>(db: &C, company_id: i64, links: SocialLinks) -> Result<Model, ModelError> {
    links.validate()?;
    let now: DateTimeWithTimeZone = Utc::now().into();
    let existing = Entity::find().filter(Column::CompanyId.eq(company_id)).one(db).await?;
    let mut am: ActiveModel = match existing {
        Some(found) => found.into(),
        None => ActiveModel { company_id: Set(company_id), created_at: Set(now), ..Default::default() },
    };
    am.website = Set(links.website);
    am.linkedin = Set(links.linkedin);
    am.facebook = Set(links.facebook);
    am.instagram = Set(links.instagram);
    am.twitter = Set(links.twitter);
    am.is_active = Set(true);
    am.updated_at = Set(now);
    am.deleted_at = Set(None);
    let saved = am.save(db).await?;
    let model = saved.try_into_model()?;
    Ok(model)
}
