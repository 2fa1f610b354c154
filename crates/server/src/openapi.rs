//! OpenAPI document served at `/api-docs/openapi.json`, browsable under `/docs`.
//!
//! Request bodies are described by the `*Doc` mirrors below so the service
//! DTOs stay free of documentation derives.
use serde::Serialize;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct EmailDoc { pub email: String }

#[derive(ToSchema)]
pub struct RegisterDoc { pub email: String, pub name: Option<String> }

#[derive(ToSchema)]
pub struct VerifyOtpDoc { pub email: String, pub otp: String }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SocialLinksDoc {
    pub website: Option<String>,
    pub linkedin: Option<String>,
    pub facebook: Option<String>,
    pub instagram: Option<String>,
    pub twitter: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRequestDoc {
    pub company_name: String,
    pub description: Option<String>,
    /// STARTUP or SERVICE_PROVIDER
    pub company_type: String,
    pub city: Option<String>,
    pub phone_number: Option<String>,
    pub logo_url: Option<String>,
    pub offerings: Vec<String>,
    pub social_links: Option<SocialLinksDoc>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CollaborationRequestDoc {
    pub target_company_id: i64,
    pub message: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageRequestDoc {
    pub collaboration_id: i64,
    pub content: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventRequestDoc {
    pub event_name: String,
    pub event_description: Option<String>,
    /// RFC 3339 timestamp
    pub event_date: String,
    pub location: Option<String>,
    pub max_participants: Option<i32>,
    pub event_type: Option<String>,
}

#[derive(ToSchema)]
pub struct EnquiryRequestDoc {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRequestDoc {
    pub session_id: Option<String>,
    pub activity_type: String,
    pub page_url: Option<String>,
    pub search_query: Option<String>,
    pub resource_id: Option<String>,
    pub resource_type: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub metadata: Option<String>,
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::send_otp,
        crate::routes::auth::verify_otp,
        crate::routes::auth::register,
        crate::routes::auth::request_login_otp,
        crate::routes::auth::verify_login_otp,
        crate::routes::auth::logout,
        crate::routes::companies::create,
        crate::routes::companies::update,
        crate::routes::companies::my_company,
        crate::routes::companies::list,
        crate::routes::companies::get_public,
        crate::routes::companies::search,
        crate::routes::companies::search_by_offering,
        crate::routes::companies::delete,
        crate::routes::collaborations::send,
        crate::routes::collaborations::sent,
        crate::routes::collaborations::received,
        crate::routes::collaborations::accept,
        crate::routes::collaborations::reject,
        crate::routes::collaborations::delete,
        crate::routes::messages::send,
        crate::routes::messages::conversation,
        crate::routes::messages::mark_read,
        crate::routes::messages::unread_count,
        crate::routes::events::create,
        crate::routes::events::update,
        crate::routes::events::delete,
        crate::routes::events::list,
        crate::routes::events::upcoming,
        crate::routes::events::past,
        crate::routes::events::mine,
        crate::routes::events::get,
        crate::routes::events::register,
        crate::routes::events::cancel_registration,
        crate::routes::enquiries::submit,
        crate::routes::enquiries::list,
        crate::routes::enquiries::update_status,
        crate::routes::enquiries::delete,
        crate::routes::cities::list,
        crate::routes::cities::add,
        crate::routes::cities::delete,
        crate::routes::activity::track,
        crate::routes::activity::analytics,
    ),
    components(
        schemas(
            HealthResponse,
            EmailDoc,
            RegisterDoc,
            VerifyOtpDoc,
            SocialLinksDoc,
            CompanyRequestDoc,
            CollaborationRequestDoc,
            MessageRequestDoc,
            EventRequestDoc,
            EnquiryRequestDoc,
            ActivityRequestDoc,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "companies"),
        (name = "collaborations"),
        (name = "messages"),
        (name = "events"),
        (name = "enquiries"),
        (name = "cities"),
        (name = "activity")
    )
)]
pub struct ApiDoc;
