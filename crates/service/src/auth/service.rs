use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use super::domain::{AuthCompany, AuthResponse, RegisterInput, VerifyOtpInput};
use super::errors::AuthError;
use super::otp::{expiry_from, generate_code, OtpCheck, OtpStore};
use super::repository::AuthRepository;
use super::token;
use crate::mail::Notifier;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub otp_ttl_minutes: i64,
}

/// Passwordless auth: email a six digit code, trade it for a bearer token.
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    otp: Arc<dyn OtpStore>,
    notifier: Notifier,
    cfg: AuthConfig,
}

fn validate_email(email: &str) -> Result<String, AuthError> {
    models::company::validate_email(email).map_err(|e| AuthError::Validation(e.to_string()))?;
    Ok(models::company::normalize_email(email))
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, otp: Arc<dyn OtpStore>, notifier: Notifier, cfg: AuthConfig) -> Self {
        Self { repo, otp, notifier, cfg }
    }

    fn issue_code(&self, email: &str) {
        let code = generate_code();
        let expires_at = expiry_from(Utc::now(), self.cfg.otp_ttl_minutes);
        debug!(%email, %code, "otp issued");
        self.otp.put(email, code.clone(), expires_at);
        self.notifier.send_otp(email, &code, self.cfg.otp_ttl_minutes);
    }

    fn session(&self, name: String, email: String, company_id: Option<i64>, profile_complete: bool) -> Result<AuthResponse, AuthError> {
        let token = token::issue(&self.cfg.jwt_secret, &email, self.cfg.token_ttl_hours)?;
        Ok(AuthResponse { token, name, email, company_id, is_verified: true, profile_complete })
    }

    /// Signup step one. Refused when an active company already uses the email.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository, otp::{InMemoryOtpStore, OtpStore}};
    /// use service::mail::{LogMailer, Notifier};
    /// tokio_test::block_on(async {
    ///     let otp = Arc::new(InMemoryOtpStore::new());
    ///     let svc = AuthService::new(
    ///         Arc::new(MockAuthRepository::default()),
    ///         otp.clone(),
    ///         Notifier::new(Arc::new(LogMailer), "noreply@startupocean.in"),
    ///         AuthConfig { jwt_secret: "secret".into(), token_ttl_hours: 12, otp_ttl_minutes: 10 },
    ///     );
    ///     svc.send_otp("new@example.com").await.unwrap();
    ///     assert!(otp.peek("new@example.com").is_some());
    /// });
    /// ```
    #[instrument(skip(self))]
    pub async fn send_otp(&self, email: &str) -> Result<(), AuthError> {
        let email = validate_email(email)?;
        if self.repo.find_active_company_by_email(&email).await?.is_some() {
            return Err(AuthError::Conflict("Account already exists with this Email".into()));
        }
        self.issue_code(&email);
        info!(%email, "signup_otp_sent");
        Ok(())
    }

    /// Signup step two. Consumes the code and issues a token for the email.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn verify_otp(&self, input: VerifyOtpInput) -> Result<AuthResponse, AuthError> {
        let email = validate_email(&input.email)?;
        match self.otp.check_and_consume(&email, &input.otp, Utc::now()) {
            OtpCheck::Valid => {}
            OtpCheck::Missing | OtpCheck::Mismatch => return Err(AuthError::Unauthorized("Invalid OTP".into())),
            OtpCheck::Expired => return Err(AuthError::Unauthorized("OTP expired".into())),
        }
        info!(%email, "signup_otp_verified");
        self.session(email.clone(), email, None, false)
    }

    /// Register is an OTP send that does not check for an existing company.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<(), AuthError> {
        let email = validate_email(&input.email)?;
        if let Some(name) = input.name.as_deref() {
            debug!(%name, "register requested");
        }
        self.issue_code(&email);
        info!(%email, "register_otp_sent");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn request_login_otp(&self, email: &str) -> Result<(), AuthError> {
        let email = validate_email(email)?;
        if self.repo.find_active_company_by_email(&email).await?.is_none() {
            return Err(AuthError::NotFound("Company not found with this email".into()));
        }
        self.issue_code(&email);
        info!(%email, "login_otp_sent");
        Ok(())
    }

    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn verify_login_otp(&self, input: VerifyOtpInput) -> Result<AuthResponse, AuthError> {
        let email = validate_email(&input.email)?;
        let company: AuthCompany = self
            .repo
            .find_active_company_by_email(&email)
            .await?
            .ok_or_else(|| AuthError::NotFound("Company not found".into()))?;
        match self.otp.check_and_consume(&email, &input.otp, Utc::now()) {
            OtpCheck::Valid => {}
            OtpCheck::Missing => return Err(AuthError::Unauthorized("OTP not requested".into())),
            OtpCheck::Mismatch => {
                warn!(%email, "login otp mismatch");
                return Err(AuthError::Unauthorized("Invalid OTP".into()));
            }
            OtpCheck::Expired => return Err(AuthError::Unauthorized("OTP expired".into())),
        }
        info!(%email, company_id = company.id, "login_succeeded");
        self.session(company.name, company.email, Some(company.id), true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::otp::InMemoryOtpStore;
    use crate::auth::repository::mock::MockAuthRepository;
    use crate::mail::RecordingMailer;

    fn build(repo: MockAuthRepository) -> (AuthService<MockAuthRepository>, Arc<InMemoryOtpStore>, Arc<RecordingMailer>) {
        let otp = Arc::new(InMemoryOtpStore::new());
        let mailer = Arc::new(RecordingMailer::default());
        let svc = AuthService::new(
            Arc::new(repo),
            otp.clone(),
            Notifier::new(mailer.clone(), "noreply@startupocean.in"),
            AuthConfig { jwt_secret: "test-secret".into(), token_ttl_hours: 12, otp_ttl_minutes: 10 },
        );
        (svc, otp, mailer)
    }

    #[tokio::test]
    async fn signup_otp_flow_issues_unbound_token() {
        let (svc, otp, mailer) = build(MockAuthRepository::default());
        svc.send_otp("New@Example.com").await.unwrap();
        let code = otp.peek("new@example.com").unwrap().code;

        let sent = mailer.wait_for(1).await;
        assert!(sent[0].body.contains(&code));

        let resp = svc.verify_otp(VerifyOtpInput { email: "new@example.com".into(), otp: code.clone() }).await.unwrap();
        assert_eq!(resp.email, "new@example.com");
        assert_eq!(resp.name, "new@example.com");
        assert_eq!(resp.company_id, None);
        assert!(resp.is_verified);
        assert!(!resp.profile_complete);
        assert_eq!(token::verify("test-secret", &resp.token).unwrap().sub, "new@example.com");

        let again = svc.verify_otp(VerifyOtpInput { email: "new@example.com".into(), otp: code }).await.unwrap_err();
        assert_eq!(again.to_string(), "Invalid OTP");
    }

    #[tokio::test]
    async fn signup_refused_for_existing_company() {
        let (svc, otp, _) = build(MockAuthRepository::default().with_company(1, "taken@example.com", "Taken"));
        let err = svc.send_otp("taken@example.com").await.unwrap_err();
        assert_eq!(err.to_string(), "Account already exists with this Email");
        assert!(otp.is_empty());
    }

    #[tokio::test]
    async fn wrong_code_is_invalid() {
        let (svc, otp, _) = build(MockAuthRepository::default());
        svc.send_otp("x@example.com").await.unwrap();
        let code = otp.peek("x@example.com").unwrap().code;
        let wrong = if code == "999999" { "100000" } else { "999999" };
        let err = svc.verify_otp(VerifyOtpInput { email: "x@example.com".into(), otp: wrong.into() }).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid OTP");
    }

    #[tokio::test]
    async fn expired_code_is_reported() {
        let (svc, otp, _) = build(MockAuthRepository::default());
        otp.put("late@example.com", "123123".into(), Utc::now() - chrono::Duration::seconds(1));
        let err = svc.verify_otp(VerifyOtpInput { email: "late@example.com".into(), otp: "123123".into() }).await.unwrap_err();
        assert_eq!(err.to_string(), "OTP expired");
    }

    #[tokio::test]
    async fn login_requires_company_and_requested_code() {
        let (svc, otp, _) = build(MockAuthRepository::default().with_company(7, "acme@example.com", "Acme"));

        let err = svc.request_login_otp("nobody@example.com").await.unwrap_err();
        assert_eq!(err.to_string(), "Company not found with this email");

        let err = svc.verify_login_otp(VerifyOtpInput { email: "acme@example.com".into(), otp: "123456".into() }).await.unwrap_err();
        assert_eq!(err.to_string(), "OTP not requested");

        svc.request_login_otp("acme@example.com").await.unwrap();
        let code = otp.peek("acme@example.com").unwrap().code;
        let resp = svc.verify_login_otp(VerifyOtpInput { email: "acme@example.com".into(), otp: code }).await.unwrap();
        assert_eq!(resp.name, "Acme");
        assert_eq!(resp.company_id, Some(7));
        assert!(resp.profile_complete);
    }

    #[tokio::test]
    async fn invalid_email_is_a_validation_error() {
        let (svc, _, _) = build(MockAuthRepository::default());
        let err = svc.send_otp("not-an-email").await.unwrap_err();
        assert_eq!(err.code(), 1001);
    }

    #[tokio::test]
    async fn register_sends_code_without_company_check() {
        let (svc, otp, _) = build(MockAuthRepository::default().with_company(1, "taken@example.com", "Taken"));
        svc.register(RegisterInput { email: "taken@example.com".into(), name: Some("Taken".into()) }).await.unwrap();
        assert!(otp.peek("taken@example.com").is_some());
    }
}
