use async_trait::async_trait;

use super::domain::AuthCompany;
use super::errors::AuthError;

/// Repository abstraction for the company lookups auth needs.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn find_active_company_by_email(&self, email: &str) -> Result<Option<AuthCompany>, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockAuthRepository {
        companies: Mutex<HashMap<String, AuthCompany>>, // key: lower-cased email
    }

    impl MockAuthRepository {
        pub fn with_company(self, id: i64, email: &str, name: &str) -> Self {
            if let Ok(mut companies) = self.companies.lock() {
                companies.insert(email.to_lowercase(), AuthCompany { id, email: email.to_lowercase(), name: name.to_string() });
            }
            self
        }
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_active_company_by_email(&self, email: &str) -> Result<Option<AuthCompany>, AuthError> {
            let companies = self.companies.lock().map_err(|e| AuthError::Repository(e.to_string()))?;
            Ok(companies.get(&email.trim().to_lowercase()).cloned())
        }
    }
}
