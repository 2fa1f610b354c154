//! Visitor activity log and the aggregate analytics over it.
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use models::user_activity;
use crate::errors::ServiceError;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRequest {
    pub session_id: Option<String>,
    #[serde(default)]
    pub activity_type: String,
    pub page_url: Option<String>,
    pub search_query: Option<String>,
    pub resource_id: Option<String>,
    pub resource_type: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub metadata: Option<String>,
}

/// What the HTTP layer knows about the caller.
#[derive(Debug, Clone, Default)]
pub struct RequestMeta {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub user_email: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub total_visits: u64,
    pub unique_visitors: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientInfo {
    pub device_type: &'static str,
    pub browser: &'static str,
    pub operating_system: &'static str,
}

/// Coarse user-agent classification. Checks run in a fixed order, first hit wins.
pub fn parse_user_agent(user_agent: &str) -> ClientInfo {
    let ua = user_agent.to_lowercase();
    let device_type = if ua.contains("mobile") || ua.contains("android") {
        "MOBILE"
    } else if ua.contains("tablet") || ua.contains("ipad") {
        "TABLET"
    } else {
        "DESKTOP"
    };
    let browser = if ua.contains("edg") {
        "Edge"
    } else if ua.contains("chrome") {
        "Chrome"
    } else if ua.contains("firefox") {
        "Firefox"
    } else if ua.contains("safari") {
        "Safari"
    } else if ua.contains("opera") || ua.contains("opr") {
        "Opera"
    } else {
        "Other"
    };
    let operating_system = if ua.contains("windows") {
        "Windows"
    } else if ua.contains("mac") {
        "MacOS"
    } else if ua.contains("linux") {
        "Linux"
    } else if ua.contains("android") {
        "Android"
    } else if ua.contains("iphone") || ua.contains("ipad") {
        "iOS"
    } else {
        "Other"
    };
    ClientInfo { device_type, browser, operating_system }
}

#[instrument(skip(db, req, meta), fields(activity_type = %req.activity_type))]
pub async fn track_activity(db: &DatabaseConnection, req: ActivityRequest, meta: RequestMeta) -> Result<(), ServiceError> {
    let activity_type = req.activity_type.trim().to_string();
    if activity_type.is_empty() {
        return Err(ServiceError::Validation("Activity type is required".into()));
    }
    let client = meta.user_agent.as_deref().filter(|ua| !ua.trim().is_empty()).map(parse_user_agent);
    let am = user_activity::ActiveModel {
        session_id: Set(req.session_id),
        user_email: Set(meta.user_email),
        activity_type: Set(activity_type),
        page_url: Set(req.page_url),
        search_query: Set(req.search_query),
        resource_id: Set(req.resource_id),
        resource_type: Set(req.resource_type),
        ip_address: Set(meta.ip_address),
        device_type: Set(client.as_ref().map(|c| c.device_type.to_string())),
        browser: Set(client.as_ref().map(|c| c.browser.to_string())),
        operating_system: Set(client.as_ref().map(|c| c.operating_system.to_string())),
        user_agent: Set(meta.user_agent),
        referrer_url: Set(meta.referrer),
        country: Set(req.country),
        city: Set(req.city),
        metadata: Set(req.metadata),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };
    let saved = am.insert(db).await?;
    debug!(activity_id = saved.id, "activity tracked");
    Ok(())
}

/// Total rows and distinct non-null session ids.
pub async fn get_analytics(db: &DatabaseConnection) -> Result<Analytics, ServiceError> {
    let total_visits = user_activity::Entity::find().count(db).await?;
    let unique_visitors = user_activity::Entity::find()
        .select_only()
        .column(user_activity::Column::SessionId)
        .distinct()
        .filter(user_activity::Column::SessionId.is_not_null())
        .count(db)
        .await?;
    Ok(Analytics { total_visits, unique_visitors })
}
