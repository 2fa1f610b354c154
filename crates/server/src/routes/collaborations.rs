use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use common::types::ApiResponse;
use service::auth::token::Claims;
use service::collaboration_service::{self, CollaborationRequest, CollaborationResponse};

use crate::{errors::ApiError, routes::auth::ServerState};

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

#[utoipa::path(post, path = "/collaborations", tag = "collaborations", request_body = crate::openapi::CollaborationRequestDoc, responses((status = 201, description = "Request sent"), (status = 400, description = "Validation Error"), (status = 404, description = "Target company not found")))]
pub async fn send(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Json(input): Json<CollaborationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CollaborationResponse>>), ApiError> {
    let created = collaboration_service::send_collaboration_request(&state.db, &state.notifier, claims.email(), input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok("Collaboration request sent successfully", created))))
}

#[utoipa::path(get, path = "/collaborations/sent", tag = "collaborations", responses((status = 200, description = "Requests sent by the caller")))]
pub async fn sent(State(state): State<ServerState>, Extension(claims): Extension<Claims>) -> ApiResult<Vec<CollaborationResponse>> {
    let found = collaboration_service::get_sent_collaborations(&state.db, claims.email()).await?;
    Ok(Json(ApiResponse::ok("Sent collaborations retrieved successfully", found)))
}

#[utoipa::path(get, path = "/collaborations/received", tag = "collaborations", responses((status = 200, description = "Requests addressed to the caller")))]
pub async fn received(State(state): State<ServerState>, Extension(claims): Extension<Claims>) -> ApiResult<Vec<CollaborationResponse>> {
    let found = collaboration_service::get_received_collaborations(&state.db, claims.email()).await?;
    Ok(Json(ApiResponse::ok("Received collaborations retrieved successfully", found)))
}

#[utoipa::path(put, path = "/collaborations/{id}/accept", tag = "collaborations", params(("id" = i64, Path,)), responses((status = 200, description = "Accepted"), (status = 404, description = "Not found")))]
pub async fn accept(State(state): State<ServerState>, Extension(claims): Extension<Claims>, Path(id): Path<i64>) -> ApiResult<CollaborationResponse> {
    let updated = collaboration_service::accept_collaboration(&state.db, claims.email(), id, state.strict_collaborations).await?;
    Ok(Json(ApiResponse::ok("Collaboration accepted", updated)))
}

#[utoipa::path(put, path = "/collaborations/{id}/reject", tag = "collaborations", params(("id" = i64, Path,)), responses((status = 200, description = "Rejected"), (status = 404, description = "Not found")))]
pub async fn reject(State(state): State<ServerState>, Extension(claims): Extension<Claims>, Path(id): Path<i64>) -> ApiResult<CollaborationResponse> {
    let updated = collaboration_service::reject_collaboration(&state.db, claims.email(), id, state.strict_collaborations).await?;
    Ok(Json(ApiResponse::ok("Collaboration rejected", updated)))
}

#[utoipa::path(delete, path = "/collaborations/{id}", tag = "collaborations", params(("id" = i64, Path,)), responses((status = 200, description = "Deleted"), (status = 404, description = "Not found")))]
pub async fn delete(State(state): State<ServerState>, Extension(claims): Extension<Claims>, Path(id): Path<i64>) -> ApiResult<()> {
    collaboration_service::delete_collaboration(&state.db, claims.email(), id, state.strict_collaborations).await?;
    Ok(Json(ApiResponse::done("Collaboration deleted successfully")))
}
