use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use migration::MigratorTrait;
use serde_json::{json, Value};
use tower::ServiceExt;

use configs::AppConfig;
use server::routes::{self, auth::ServerState};
use service::auth::otp::OtpStore;
use service::mail::LogMailer;

async fn build_app(strict: bool) -> anyhow::Result<(Router, ServerState)> {
    let mut cfg = AppConfig::default();
    cfg.database.url = "sqlite::memory:".into();
    cfg.auth.jwt_secret = "test-secret".into();
    cfg.collaboration.strict_transitions = strict;
    let db = models::db::connect_with_config(&cfg.database).await?;
    migration::Migrator::up(&db, None).await?;
    let state = ServerState::new(db, &cfg, Arc::new(LogMailer));
    let app = routes::build_router(state.clone(), tower_http::cors::CorsLayer::very_permissive());
    Ok((app, state))
}

async fn call(app: &Router, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> anyhow::Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        builder = builder.header("authorization", format!("Bearer {}", t));
    }
    let req = match body {
        Some(v) => builder.header("content-type", "application/json").body(Body::from(serde_json::to_vec(&v)?))?,
        None => builder.body(Body::empty())?,
    };
    let resp = app.clone().oneshot(req).await?;
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, json))
}

/// Signup OTP round trip; returns the bearer token.
async fn signup(app: &Router, state: &ServerState, email: &str) -> anyhow::Result<String> {
    let (status, _) = call(app, "POST", &format!("/auth/send-otp?email={}", email), None, None).await?;
    assert_eq!(status, StatusCode::OK);
    let code = state.otp_store.peek(email).map(|e| e.code).unwrap_or_default();
    let (status, body) = call(app, "POST", "/auth/verify-otp", None, Some(json!({"email": email, "otp": code}))).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(body["data"]["token"].as_str().unwrap_or_default().to_string())
}

async fn create_company(app: &Router, token: &str, name: &str) -> anyhow::Result<i64> {
    let payload = json!({
        "companyName": name,
        "description": format!("{} description", name),
        "companyType": "STARTUP",
        "city": "Pune",
        "phoneNumber": "9876543210",
        "offerings": ["Cloud", "AI"],
        "socialLinks": {"website": "https://example.com"}
    });
    let (status, body) = call(app, "POST", "/companies", Some(token), Some(payload)).await?;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    Ok(body["data"]["companyId"].as_i64().unwrap_or_default())
}

#[tokio::test]
async fn health_is_public() -> anyhow::Result<()> {
    let (app, _) = build_app(false).await?;
    let (status, body) = call(&app, "GET", "/health", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() -> anyhow::Result<()> {
    let (app, _) = build_app(false).await?;
    let (status, body) = call(&app, "GET", "/companies/my-company", None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Missing bearer token");

    let (status, body) = call(&app, "GET", "/companies/my-company", Some("not-a-jwt"), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid or expired token");

    // a bad token on a public route is ignored
    let (status, _) = call(&app, "GET", "/companies", Some("not-a-jwt"), None).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn signup_company_and_login_with_cookie() -> anyhow::Result<()> {
    let (app, state) = build_app(false).await?;
    let token = signup(&app, &state, "founder@acme.io").await?;
    let id = create_company(&app, &token, "Acme").await?;

    let (status, body) = call(&app, "GET", "/companies/my-company", Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["companyId"], id);
    assert_eq!(body["data"]["offerings"], json!(["Cloud", "AI"]));

    let (status, body) = call(&app, "POST", "/auth/send-otp?email=founder@acme.io", None, None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Account already exists with this Email");

    let (status, _) = call(&app, "POST", "/auth/login/request-otp", None, Some(json!({"email": "founder@acme.io"}))).await?;
    assert_eq!(status, StatusCode::OK);
    let code = state.otp_store.peek("founder@acme.io").map(|e| e.code).unwrap_or_default();
    let req = Request::builder()
        .method("POST")
        .uri("/auth/login/verify-otp")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&json!({"email": "founder@acme.io", "otp": code}))?))?;
    let resp = app.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = resp
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(cookie.starts_with("auth_token="));

    // the cookie alone authenticates
    let pair = cookie.split(';').next().unwrap_or_default().to_string();
    let req = Request::builder().uri("/companies/my-company").header("cookie", pair).body(Body::empty())?;
    let resp = app.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let (status, body) = call(&app, "GET", "/companies/search?keyword=acme", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().map(|a| a.len()), Some(1));
    Ok(())
}

#[tokio::test]
async fn collaboration_gates_messaging() -> anyhow::Result<()> {
    let (app, state) = build_app(true).await?;
    let alpha = signup(&app, &state, "alpha@x.io").await?;
    let beta = signup(&app, &state, "beta@x.io").await?;
    create_company(&app, &alpha, "Alpha").await?;
    let beta_id = create_company(&app, &beta, "Beta").await?;

    let (status, body) = call(&app, "POST", "/collaborations", Some(&alpha), Some(json!({"targetCompanyId": beta_id, "message": "Partner?"}))).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "PENDING");
    let collab_id = body["data"]["id"].as_i64().unwrap_or_default();

    let msg = json!({"collaborationId": collab_id, "content": "hello"});
    let (status, body) = call(&app, "POST", "/messages", Some(&alpha), Some(msg.clone())).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Messages can only be sent in accepted collaborations");

    // strict mode: the requester cannot accept its own request
    let (status, _) = call(&app, "PUT", &format!("/collaborations/{}/accept", collab_id), Some(&alpha), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, body) = call(&app, "PUT", &format!("/collaborations/{}/accept", collab_id), Some(&beta), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ACCEPTED");

    let (status, _) = call(&app, "POST", "/messages", Some(&alpha), Some(msg)).await?;
    assert_eq!(status, StatusCode::CREATED);
    let (_, body) = call(&app, "GET", "/messages/unread/count", Some(&beta), None).await?;
    assert_eq!(body["data"]["unreadCount"], 1);

    let (status, body) = call(&app, "GET", &format!("/messages/collaboration/{}", collab_id), Some(&beta), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["senderCompanyName"], "Alpha");
    Ok(())
}

#[tokio::test]
async fn events_are_public_to_read_and_capacity_bound() -> anyhow::Result<()> {
    let (app, state) = build_app(false).await?;
    let org = signup(&app, &state, "org@x.io").await?;
    let guest = signup(&app, &state, "guest@x.io").await?;
    create_company(&app, &org, "Org").await?;
    create_company(&app, &guest, "Guest").await?;

    let date = (chrono::Utc::now() + chrono::Duration::days(3)).to_rfc3339();
    let payload = json!({"eventName": "Demo Day", "eventDate": date, "maxParticipants": 1});
    let (status, body) = call(&app, "POST", "/events", Some(&org), Some(payload)).await?;
    assert_eq!(status, StatusCode::CREATED);
    let event_id = body["data"]["eventId"].as_i64().unwrap_or_default();

    let (status, body) = call(&app, "POST", "/events", Some(&org), Some(json!({"eventName": "No date"}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Event date is required");

    let (status, _) = call(&app, "POST", &format!("/events/{}/register", event_id), Some(&guest), None).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = call(&app, "POST", &format!("/events/{}/register", event_id), Some(&org), None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Event is full");

    let (status, body) = call(&app, "GET", "/events/upcoming", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["registeredParticipants"], 1);
    assert_eq!(body["data"][0]["isRegistered"], false);

    let (_, body) = call(&app, "GET", &format!("/events/{}", event_id), Some(&guest), None).await?;
    assert_eq!(body["data"]["isRegistered"], true);

    let (status, _) = call(&app, "GET", "/events/my-events", None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn enquiries_cities_and_activity() -> anyhow::Result<()> {
    let (app, state) = build_app(false).await?;
    let admin = signup(&app, &state, "admin@x.io").await?;

    let enquiry = json!({"name": "Visitor", "email": "v@mail.com", "message": "Hi there"});
    let (status, body) = call(&app, "POST", "/enquiries/submit", None, Some(enquiry)).await?;
    assert_eq!(status, StatusCode::CREATED);
    let enquiry_id = body["data"]["enquiryId"].as_i64().unwrap_or_default();
    let (status, _) = call(&app, "GET", "/enquiries", None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, body) = call(&app, "PUT", &format!("/enquiries/{}/status?status=RESOLVED", enquiry_id), Some(&admin), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "RESOLVED");

    let (status, _) = call(&app, "POST", "/cities?cityName=Pune", Some(&admin), None).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = call(&app, "POST", "/cities?cityName=pune", Some(&admin), None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "City already exists");
    let (_, body) = call(&app, "GET", "/cities", None, None).await?;
    assert_eq!(body["data"][0]["cityName"], "Pune");

    let req = Request::builder()
        .method("POST")
        .uri("/activity/track")
        .header("content-type", "application/json")
        .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
        .header("user-agent", "Mozilla/5.0 (Windows NT 10.0) Chrome/120.0")
        .body(Body::from(serde_json::to_vec(&json!({"sessionId": "s-1", "activityType": "PAGE_VIEW"}))?))?;
    let resp = app.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let (status, body) = call(&app, "GET", "/activity/analytics", Some(&admin), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({"totalVisits": 1, "uniqueVisitors": 1}));
    Ok(())
}
