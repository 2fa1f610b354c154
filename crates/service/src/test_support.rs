#![cfg(test)]
use configs::DatabaseConfig;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use models::db::connect_with_config;

use crate::company_service::{self, CompanyRequest, CompanyResponse};

/// Fresh in-memory database per call, migrated to the latest schema.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let cfg = DatabaseConfig { url: "sqlite::memory:".into(), ..Default::default() };
    let db = connect_with_config(&cfg).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

pub fn company_request(name: &str, offerings: &[&str]) -> CompanyRequest {
    CompanyRequest {
        company_name: name.to_string(),
        description: Some(format!("{} builds things", name)),
        company_type: "STARTUP".into(),
        city: Some("Pune".into()),
        phone_number: Some("9876543210".into()),
        logo_url: None,
        offerings: offerings.iter().map(|o| o.to_string()).collect(),
        social_links: Default::default(),
    }
}

/// Register a company for `email` with a single offering.
pub async fn seed_company(db: &DatabaseConnection, email: &str, name: &str) -> Result<CompanyResponse, anyhow::Error> {
    Ok(company_service::create_company(db, email, company_request(name, &["Consulting"])).await?)
}
