use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use common::types::ApiResponse;
use service::auth::token::Claims;
use service::message_service::{self, MessageRequest, MessageResponse, UnreadCount};

use crate::{errors::ApiError, routes::auth::ServerState};

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

#[utoipa::path(post, path = "/messages", tag = "messages", request_body = crate::openapi::MessageRequestDoc, responses((status = 201, description = "Sent"), (status = 400, description = "Collaboration not accepted"), (status = 403, description = "Not a party")))]
pub async fn send(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Json(input): Json<MessageRequest>,
) -> Result<(StatusCode, Json<ApiResponse<MessageResponse>>), ApiError> {
    let created = message_service::send_message(&state.db, claims.email(), input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok("Message sent successfully", created))))
}

#[utoipa::path(get, path = "/messages/collaboration/{id}", tag = "messages", params(("id" = i64, Path,)), responses((status = 200, description = "Conversation, oldest first"), (status = 403, description = "Not a party")))]
pub async fn conversation(State(state): State<ServerState>, Extension(claims): Extension<Claims>, Path(id): Path<i64>) -> ApiResult<Vec<MessageResponse>> {
    let found = message_service::get_messages(&state.db, claims.email(), id).await?;
    Ok(Json(ApiResponse::ok("Messages retrieved successfully", found)))
}

#[utoipa::path(put, path = "/messages/{id}/read", tag = "messages", params(("id" = i64, Path,)), responses((status = 200, description = "Marked as read"), (status = 404, description = "Message not found")))]
pub async fn mark_read(State(state): State<ServerState>, Extension(claims): Extension<Claims>, Path(id): Path<i64>) -> ApiResult<MessageResponse> {
    let updated = message_service::mark_as_read(&state.db, claims.email(), id).await?;
    Ok(Json(ApiResponse::ok("Message marked as read", updated)))
}

#[utoipa::path(get, path = "/messages/unread/count", tag = "messages", responses((status = 200, description = "Unread messages from other parties")))]
pub async fn unread_count(State(state): State<ServerState>, Extension(claims): Extension<Claims>) -> ApiResult<UnreadCount> {
    let count = message_service::get_unread_message_count(&state.db, claims.email()).await?;
    Ok(Json(ApiResponse::ok("Unread count retrieved successfully", count)))
}
