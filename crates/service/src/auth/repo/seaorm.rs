use sea_orm::DatabaseConnection;

use crate::auth::domain::AuthCompany;
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;

pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

#[async_trait::async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_active_company_by_email(&self, email: &str) -> Result<Option<AuthCompany>, AuthError> {
        let res = models::company::find_active_by_email(&self.db, email)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(|c| AuthCompany { id: c.id, email: c.email, name: c.company_name }))
    }
}
