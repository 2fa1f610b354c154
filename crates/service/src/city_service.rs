use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use models::city;
use crate::errors::ServiceError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityResponse {
    pub city_id: i64,
    pub city_name: String,
}

impl From<city::Model> for CityResponse {
    fn from(m: city::Model) -> Self {
        Self { city_id: m.id, city_name: m.city_name }
    }
}

/// Duplicate check ignores case and includes deactivated cities.
#[instrument(skip(db))]
pub async fn add_city(db: &DatabaseConnection, name: &str) -> Result<CityResponse, ServiceError> {
    if city::find_by_name_ignore_case(db, name).await?.is_some() {
        return Err(ServiceError::Conflict("City already exists".into()));
    }
    let created = city::create(db, name).await?;
    info!(city_id = created.id, city = %created.city_name, "city_added");
    Ok(created.into())
}

pub async fn get_all_cities(db: &DatabaseConnection) -> Result<Vec<CityResponse>, ServiceError> {
    let rows = city::Entity::find()
        .filter(city::Column::IsActive.eq(true))
        .order_by_asc(city::Column::CityName)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(CityResponse::from).collect())
}

#[instrument(skip(db))]
pub async fn delete_city(db: &DatabaseConnection, id: i64) -> Result<(), ServiceError> {
    let found = city::Entity::find_by_id(id)
        .filter(city::Column::IsActive.eq(true))
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("City"))?;
    city::deactivate(db, found).await?;
    info!(city_id = id, "city_deactivated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn duplicates_are_case_insensitive() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        add_city(&db, "Pune").await?;
        let err = add_city(&db, " pune ").await.unwrap_err();
        assert_eq!(err.to_string(), "City already exists");
        Ok(())
    }

    #[tokio::test]
    async fn deactivated_city_is_hidden_but_still_blocks_its_name() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let mumbai = add_city(&db, "Mumbai").await?;
        add_city(&db, "Delhi").await?;
        delete_city(&db, mumbai.city_id).await?;

        let names: Vec<String> = get_all_cities(&db).await?.into_iter().map(|c| c.city_name).collect();
        assert_eq!(names, vec!["Delhi".to_string()]);
        assert!(add_city(&db, "MUMBAI").await.is_err());

        let err = delete_city(&db, mumbai.city_id).await.unwrap_err();
        assert_eq!(err.to_string(), "City not found");
        Ok(())
    }
}
