use sea_orm::{prelude::DateTimeWithTimeZone, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use models::enquiry::{self, EnquiryStatus};
use crate::errors::ServiceError;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnquiryRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnquiryResponse {
    pub enquiry_id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub status: EnquiryStatus,
    pub created_at: DateTimeWithTimeZone,
}

impl From<enquiry::Model> for EnquiryResponse {
    fn from(m: enquiry::Model) -> Self {
        Self {
            enquiry_id: m.id,
            name: m.name,
            email: m.email,
            phone: m.phone,
            message: m.message,
            status: m.status,
            created_at: m.created_at,
        }
    }
}

async fn find_active(db: &DatabaseConnection, id: i64) -> Result<enquiry::Model, ServiceError> {
    enquiry::Entity::find_by_id(id)
        .filter(enquiry::Column::IsActive.eq(true))
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Enquiry"))
}

/// Public contact form. New enquiries start as NEW.
#[instrument(skip(db, req), fields(email = %req.email))]
pub async fn submit_enquiry(db: &DatabaseConnection, req: EnquiryRequest) -> Result<EnquiryResponse, ServiceError> {
    let phone = req.phone.map(|p| p.trim().to_string()).filter(|p| !p.is_empty());
    let created = enquiry::create(db, &req.name, &req.email, phone, &req.message).await?;
    info!(enquiry_id = created.id, "enquiry_submitted");
    Ok(created.into())
}

/// Newest first.
pub async fn get_all_enquiries(db: &DatabaseConnection) -> Result<Vec<EnquiryResponse>, ServiceError> {
    let rows = enquiry::Entity::find()
        .filter(enquiry::Column::IsActive.eq(true))
        .order_by_desc(enquiry::Column::CreatedAt)
        .order_by_desc(enquiry::Column::Id)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(EnquiryResponse::from).collect())
}

#[instrument(skip(db))]
pub async fn update_enquiry_status(db: &DatabaseConnection, id: i64, status: &str) -> Result<EnquiryResponse, ServiceError> {
    let status: EnquiryStatus = status.parse()?;
    let existing = find_active(db, id).await?;
    let updated = enquiry::set_status(db, existing, status).await?;
    info!(enquiry_id = id, ?status, "enquiry_status_changed");
    Ok(updated.into())
}

#[instrument(skip(db))]
pub async fn delete_enquiry(db: &DatabaseConnection, id: i64) -> Result<(), ServiceError> {
    let existing = find_active(db, id).await?;
    enquiry::soft_delete(db, existing).await?;
    info!(enquiry_id = id, "enquiry_deleted");
    Ok(())
}
