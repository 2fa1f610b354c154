use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use common::types::ApiResponse;
use service::enquiry_service::{self, EnquiryRequest, EnquiryResponse};

use crate::{errors::ApiError, routes::auth::ServerState};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct StatusQuery {
    pub status: String,
}

#[utoipa::path(post, path = "/enquiries/submit", tag = "enquiries", request_body = crate::openapi::EnquiryRequestDoc, responses((status = 201, description = "Submitted"), (status = 400, description = "Validation Error")))]
pub async fn submit(State(state): State<ServerState>, Json(input): Json<EnquiryRequest>) -> Result<(StatusCode, Json<ApiResponse<EnquiryResponse>>), ApiError> {
    let created = enquiry_service::submit_enquiry(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok("Enquiry submitted successfully", created))))
}

#[utoipa::path(get, path = "/enquiries", tag = "enquiries", responses((status = 200, description = "Active enquiries, newest first")))]
pub async fn list(State(state): State<ServerState>) -> Result<Json<ApiResponse<Vec<EnquiryResponse>>>, ApiError> {
    let found = enquiry_service::get_all_enquiries(&state.db).await?;
    Ok(Json(ApiResponse::ok("Enquiries retrieved successfully", found)))
}

#[utoipa::path(put, path = "/enquiries/{id}/status", tag = "enquiries", params(("id" = i64, Path,), StatusQuery), responses((status = 200, description = "Status updated"), (status = 400, description = "Invalid status")))]
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Query(q): Query<StatusQuery>,
) -> Result<Json<ApiResponse<EnquiryResponse>>, ApiError> {
    let updated = enquiry_service::update_enquiry_status(&state.db, id, &q.status).await?;
    Ok(Json(ApiResponse::ok("Enquiry status updated successfully", updated)))
}

#[utoipa::path(delete, path = "/enquiries/{id}", tag = "enquiries", params(("id" = i64, Path,)), responses((status = 200, description = "Deleted"), (status = 404, description = "Not found")))]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> Result<Json<ApiResponse<()>>, ApiError> {
    enquiry_service::delete_enquiry(&state.db, id).await?;
    Ok(Json(ApiResponse::done("Enquiry deleted successfully")))
}
