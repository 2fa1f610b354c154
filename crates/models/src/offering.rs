use chrono::Utc;
use sea_orm::{entity::prelude::*, sea_query::Expr, ConnectionTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::company;
use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "offering")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub company_id: i64,
    pub offering_name: String,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
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

/// Trimmed, non-empty names only; at least one is required.
pub fn validate_names(names: &[String]) -> Result<Vec<String>, ModelError> {
    let cleaned: Vec<String> = names
        .iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect();
    if cleaned.is_empty() {
        return Err(ModelError::Validation("At least one offering is required".into()));
    }
    if cleaned.iter().any(|n| n.chars().count() > 255) {
        return Err(ModelError::Validation("Offering name must not exceed 255 characters".into()));
    }
    Ok(cleaned)
}

/// Active offerings of the given companies, oldest first.
pub async fn active_for_companies<C: ConnectionTrait>(db: &C, company_ids: Vec<i64>) -> Result<Vec<Model>, ModelError> {
    if company_ids.is_empty() { return Ok(vec![]); }
    let found = Entity::find()
        .filter(Column::CompanyId.is_in(company_ids))
        .filter(Column::IsActive.eq(true))
        .order_by_asc(Column::Id)
        .all(db)
        .await?;
    Ok(found)
}

pub async fn insert_many<C: ConnectionTrait>(db: &C, company_id: i64, names: &[String]) -> Result<(), ModelError> {
    let now: DateTimeWithTimeZone = Utc::now().into();
    for name in names {
        let am = ActiveModel {
            company_id: Set(company_id),
            offering_name: Set(name.clone()),
            is_active: Set(true),
            created_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };
        am.insert(db).await?;
    }
    Ok(())
}

/// Soft-delete the current set and insert `names` as the new set.
pub async fn replace_for_company<C: ConnectionTrait>(db: &C, company_id: i64, names: &[String]) -> Result<(), ModelError> {
    let now: DateTimeWithTimeZone = Utc::now().into();
    Entity::update_many()
        .col_expr(Column::IsActive, Expr::value(false))
        .col_expr(Column::DeletedAt, Expr::value(Some(now)))
        .filter(Column::CompanyId.eq(company_id))
        .filter(Column::IsActive.eq(true))
        .exec(db)
        .await?;
    insert_many(db, company_id, names).await
}
