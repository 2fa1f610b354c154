use std::sync::Arc;

use axum::{
    extract::{Query, Request, State},
    http::{header, Method, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use tracing::{debug, warn};

use common::types::ApiResponse;
use configs::AppConfig;
use service::auth::domain::{AuthResponse, RegisterInput, VerifyOtpInput};
use service::auth::otp::InMemoryOtpStore;
use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::service::{AuthConfig, AuthService};
use service::auth::token::{self, Claims};
use service::mail::{Mailer, Notifier};

use crate::errors::ApiError;

pub const AUTH_COOKIE: &str = "auth_token";

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
}

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: ServerAuthConfig,
    pub auth_service: Arc<AuthService<SeaOrmAuthRepository>>,
    pub otp_store: Arc<InMemoryOtpStore>,
    pub notifier: Notifier,
    pub strict_collaborations: bool,
}

impl ServerState {
    pub fn new(db: DatabaseConnection, cfg: &AppConfig, mailer: Arc<dyn Mailer>) -> Self {
        let otp_store = Arc::new(InMemoryOtpStore::new());
        let notifier = Notifier::new(mailer, cfg.mail.from.clone());
        let auth_service = AuthService::new(
            Arc::new(SeaOrmAuthRepository { db: db.clone() }),
            otp_store.clone(),
            notifier.clone(),
            AuthConfig {
                jwt_secret: cfg.auth.jwt_secret.clone(),
                token_ttl_hours: cfg.auth.token_ttl_hours,
                otp_ttl_minutes: cfg.auth.otp_ttl_minutes,
            },
        );
        Self {
            db,
            auth: ServerAuthConfig { jwt_secret: cfg.auth.jwt_secret.clone() },
            auth_service: Arc::new(auth_service),
            otp_store,
            notifier,
            strict_collaborations: cfg.collaboration.strict_transitions,
        }
    }
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct EmailQuery {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct EmailBody {
    pub email: String,
}

#[utoipa::path(post, path = "/auth/send-otp", tag = "auth", params(EmailQuery), responses((status = 200, description = "OTP sent"), (status = 400, description = "Account exists or invalid email")))]
pub async fn send_otp(State(state): State<ServerState>, Query(q): Query<EmailQuery>) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.auth_service.send_otp(&q.email).await?;
    Ok(Json(ApiResponse::done("OTP sent successfully")))
}

#[utoipa::path(post, path = "/auth/verify-otp", tag = "auth", request_body = crate::openapi::VerifyOtpDoc, responses((status = 200, description = "Verified, token issued"), (status = 401, description = "Invalid or expired OTP")))]
pub async fn verify_otp(State(state): State<ServerState>, Json(input): Json<VerifyOtpInput>) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    let session = state.auth_service.verify_otp(input).await?;
    Ok(Json(ApiResponse::ok("OTP verified successfully", session)))
}

#[utoipa::path(post, path = "/auth/register", tag = "auth", request_body = crate::openapi::RegisterDoc, responses((status = 201, description = "OTP sent"), (status = 400, description = "Bad Request")))]
pub async fn register(State(state): State<ServerState>, Json(input): Json<RegisterInput>) -> Result<(StatusCode, Json<ApiResponse<()>>), ApiError> {
    state.auth_service.register(input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::done("OTP sent"))))
}

#[utoipa::path(post, path = "/auth/login/request-otp", tag = "auth", request_body = crate::openapi::EmailDoc, responses((status = 200, description = "Login OTP sent"), (status = 404, description = "Company not found")))]
pub async fn request_login_otp(State(state): State<ServerState>, Json(input): Json<EmailBody>) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.auth_service.request_login_otp(&input.email).await?;
    Ok(Json(ApiResponse::done("Login OTP sent successfully")))
}

fn session_cookie(token: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(AUTH_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(false);
    cookie.set_same_site(SameSite::Lax);
    cookie
}

#[utoipa::path(post, path = "/auth/login/verify-otp", tag = "auth", request_body = crate::openapi::VerifyOtpDoc, responses((status = 200, description = "Logged in, cookie set"), (status = 401, description = "Invalid or expired OTP")))]
pub async fn verify_login_otp(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(input): Json<VerifyOtpInput>,
) -> Result<(CookieJar, Json<ApiResponse<AuthResponse>>), ApiError> {
    let session = state.auth_service.verify_login_otp(input).await?;
    let jar = jar.add(session_cookie(session.token.clone()));
    Ok((jar, Json(ApiResponse::ok("Login successful", session))))
}

#[utoipa::path(post, path = "/auth/logout", tag = "auth", responses((status = 204, description = "Cookie cleared")))]
pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    let jar = jar.remove(Cookie::build(AUTH_COOKIE).path("/"));
    (jar, StatusCode::NO_CONTENT)
}

/// Routes reachable without a token. A valid token is still decoded on them.
pub fn is_public(method: &Method, path: &str) -> bool {
    if method == Method::OPTIONS {
        return true;
    }
    if path == "/health" || path.starts_with("/docs") || path.starts_with("/api-docs") || path.starts_with("/auth/") {
        return true;
    }
    let segments: Vec<&str> = path.trim_end_matches('/').split('/').filter(|s| !s.is_empty()).collect();
    match (method, segments.as_slice()) {
        (&Method::GET, ["companies"]) => true,
        (&Method::GET, ["companies", "public", _]) => true,
        (&Method::GET, ["companies", "search"]) => true,
        (&Method::GET, ["companies", "search", "offering"]) => true,
        (&Method::GET, ["events"]) => true,
        (&Method::GET, ["events", "my-events"]) => false,
        (&Method::GET, ["events", _]) => true,
        (&Method::POST, ["enquiries", "submit"]) => true,
        (&Method::GET, ["cities"]) => true,
        (&Method::POST, ["activity", "track"]) => true,
        _ => false,
    }
}

enum BearerToken {
    Missing,
    Malformed,
    Present(String),
}

/// Authorization header first, then the `auth_token` cookie.
fn bearer_token(req: &Request) -> BearerToken {
    if let Some(h) = req.headers().get(header::AUTHORIZATION) {
        return match h.to_str().ok().and_then(|v| v.strip_prefix("Bearer ")) {
            Some(t) if !t.trim().is_empty() => BearerToken::Present(t.trim().to_string()),
            _ => BearerToken::Malformed,
        };
    }
    let jar = CookieJar::from_headers(req.headers());
    match jar.get(AUTH_COOKIE).map(|c| c.value().to_string()) {
        Some(t) if !t.is_empty() => BearerToken::Present(t),
        _ => BearerToken::Missing,
    }
}

/// 全局中间件：公开路由放行（有合法 token 时仍注入 Claims），其余路由必须携带 Bearer token
/// 缺失与非法 token 均返回 401 envelope
pub async fn require_bearer_token_state(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let public = is_public(req.method(), req.uri().path());
    let claims: Result<Claims, &'static str> = match bearer_token(&req) {
        BearerToken::Present(t) => token::verify(&state.auth.jwt_secret, &t).map_err(|e| {
            debug!(path = %req.uri().path(), err = %e, "token validation failed");
            "Invalid or expired token"
        }),
        BearerToken::Malformed => Err("Invalid or expired token"),
        BearerToken::Missing => Err("Missing bearer token"),
    };
    match claims {
        Ok(c) => {
            req.extensions_mut().insert(c);
            Ok(next.run(req).await)
        }
        Err(_) if public => Ok(next.run(req).await),
        Err(msg) => {
            warn!(path = %req.uri().path(), method = %req.method(), reason = msg, "rejected unauthenticated request");
            Err(ApiError::unauthorized(msg))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_routes_are_classified() {
        assert!(is_public(&Method::GET, "/health"));
        assert!(is_public(&Method::POST, "/auth/send-otp"));
        assert!(is_public(&Method::GET, "/companies"));
        assert!(is_public(&Method::GET, "/companies/public/3"));
        assert!(is_public(&Method::GET, "/companies/search/offering"));
        assert!(is_public(&Method::GET, "/events/upcoming"));
        assert!(is_public(&Method::GET, "/events/12"));
        assert!(is_public(&Method::POST, "/enquiries/submit"));
        assert!(is_public(&Method::GET, "/cities"));
        assert!(is_public(&Method::POST, "/activity/track"));
        assert!(is_public(&Method::OPTIONS, "/companies/my-company"));
    }

    #[test]
    fn protected_routes_are_classified() {
        assert!(!is_public(&Method::GET, "/companies/my-company"));
        assert!(!is_public(&Method::POST, "/companies"));
        assert!(!is_public(&Method::GET, "/events/my-events"));
        assert!(!is_public(&Method::POST, "/events/4/register"));
        assert!(!is_public(&Method::PUT, "/events/4"));
        assert!(!is_public(&Method::GET, "/enquiries"));
        assert!(!is_public(&Method::POST, "/cities"));
        assert!(!is_public(&Method::GET, "/activity/analytics"));
        assert!(!is_public(&Method::GET, "/messages/unread/count"));
    }
}
