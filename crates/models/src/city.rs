use chrono::Utc;
use sea_orm::{
    entity::prelude::*,
    sea_query::{Expr, Func},
    ConnectionTrait, QueryFilter, Set,
};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "city")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub city_name: String,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { panic!("no relations defined here") }
}

impl ActiveModelBehavior for ActiveModel {}

/// Case-insensitive lookup, active or not.
pub async fn find_by_name_ignore_case<C: ConnectionTrait>(db: &C, name: &str) -> Result<Option<Model>, ModelError> {
    let found = Entity::find()
        .filter(Expr::expr(Func::lower(Expr::col(Column::CityName))).eq(name.trim().to_lowercase()))
        .one(db)
        .await?;
    Ok(found)
}

pub async fn create<C: ConnectionTrait>(db: &C, name: &str) -> Result<Model, ModelError> {
    let name = name.trim();
    if name.is_empty() { return Err(ModelError::Validation("City name is required".into())); }
    if name.chars().count() > 128 { return Err(ModelError::Validation("City name must not exceed 128 characters".into())); }
    let am = ActiveModel {
        city_name: Set(name.to_string()),
        is_active: Set(true),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };
    let created = am.insert(db).await?;
    Ok(created)
}

pub async fn deactivate<C: ConnectionTrait>(db: &C, city: Model) -> Result<Model, ModelError> {
    let mut am: ActiveModel = city.into();
    am.is_active = Set(false);
    let updated = am.update(db).await?;
    Ok(updated)
}
