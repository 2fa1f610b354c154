//! HS256 bearer tokens. The subject is the company email.
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::errors::AuthError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn email(&self) -> &str { &self.sub }
}

pub fn issue(secret: &str, email: &str, ttl_hours: i64) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = Claims {
        sub: email.to_string(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::hours(ttl_hours)).timestamp() as usize,
    };
    encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| AuthError::TokenError(e.to_string()))
}

pub fn verify(secret: &str, token: &str) -> Result<Claims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|e| AuthError::TokenError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_round_trips_subject() {
        let t = issue("secret", "a@b.co", 1).unwrap();
        let claims = verify("secret", &t).unwrap();
        assert_eq!(claims.email(), "a@b.co");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let t = issue("secret", "a@b.co", 1).unwrap();
        assert!(verify("other", &t).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let t = issue("secret", "a@b.co", -2).unwrap();
        assert!(verify("secret", &t).is_err());
    }
}
