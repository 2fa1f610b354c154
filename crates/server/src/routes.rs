pub mod activity;
pub mod auth;
pub mod cities;
pub mod collaborations;
pub mod companies;
pub mod enquiries;
pub mod events;
pub mod messages;

use axum::{
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::openapi::ApiDoc;
use auth::ServerState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Service is up")))]
pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

/// Build the full application router. Every route passes the bearer middleware,
/// which decides per path whether a token is required.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let auth_routes = Router::new()
        .route("/auth/send-otp", post(auth::send_otp))
        .route("/auth/verify-otp", post(auth::verify_otp))
        .route("/auth/register", post(auth::register))
        .route("/auth/login/request-otp", post(auth::request_login_otp))
        .route("/auth/login/verify-otp", post(auth::verify_login_otp))
        .route("/auth/logout", post(auth::logout));

    let company_routes = Router::new()
        .route("/companies", get(companies::list).post(companies::create))
        .route("/companies/my-company", get(companies::my_company))
        .route("/companies/public/:id", get(companies::get_public))
        .route("/companies/search", get(companies::search))
        .route("/companies/search/offering", get(companies::search_by_offering))
        .route("/companies/:id", put(companies::update).delete(companies::delete));

    let collaboration_routes = Router::new()
        .route("/collaborations", post(collaborations::send))
        .route("/collaborations/sent", get(collaborations::sent))
        .route("/collaborations/received", get(collaborations::received))
        .route("/collaborations/:id/accept", put(collaborations::accept))
        .route("/collaborations/:id/reject", put(collaborations::reject))
        .route("/collaborations/:id", axum::routing::delete(collaborations::delete));

    let message_routes = Router::new()
        .route("/messages", post(messages::send))
        .route("/messages/collaboration/:id", get(messages::conversation))
        .route("/messages/:id/read", put(messages::mark_read))
        .route("/messages/unread/count", get(messages::unread_count));

    let event_routes = Router::new()
        .route("/events", get(events::list).post(events::create))
        .route("/events/upcoming", get(events::upcoming))
        .route("/events/past", get(events::past))
        .route("/events/my-events", get(events::mine))
        .route("/events/:id", get(events::get).put(events::update).delete(events::delete))
        .route("/events/:id/register", post(events::register).delete(events::cancel_registration));

    let misc_routes = Router::new()
        .route("/health", get(health))
        .route("/enquiries/submit", post(enquiries::submit))
        .route("/enquiries", get(enquiries::list))
        .route("/enquiries/:id/status", put(enquiries::update_status))
        .route("/enquiries/:id", axum::routing::delete(enquiries::delete))
        .route("/cities", get(cities::list).post(cities::add))
        .route("/cities/:id", axum::routing::delete(cities::delete))
        .route("/activity/track", post(activity::track))
        .route("/activity/analytics", get(activity::analytics));

    Router::new()
        .merge(auth_routes)
        .merge(company_routes)
        .merge(collaboration_routes)
        .merge(message_routes)
        .merge(event_routes)
        .merge(misc_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn_with_state(state.clone(), auth::require_bearer_token_state))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径等，日志级别为 INFO
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // 响应返回时打点，包含状态码与耗时
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 失败（5xx 等）时以 ERROR 记录
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
