use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use common::types::ApiResponse;
use service::auth::token::Claims;
use service::event_service::{self, EventRequest, EventResponse};

use crate::{errors::ApiError, routes::auth::ServerState};

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

fn viewer(claims: &Option<Extension<Claims>>) -> Option<&str> {
    claims.as_ref().map(|Extension(c)| c.email())
}

#[utoipa::path(post, path = "/events", tag = "events", request_body = crate::openapi::EventRequestDoc, responses((status = 201, description = "Created"), (status = 400, description = "Validation Error")))]
pub async fn create(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Json(input): Json<EventRequest>,
) -> Result<(StatusCode, Json<ApiResponse<EventResponse>>), ApiError> {
    let created = event_service::create_event(&state.db, claims.email(), input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok("Event created successfully", created))))
}

#[utoipa::path(put, path = "/events/{id}", tag = "events", request_body = crate::openapi::EventRequestDoc, params(("id" = i64, Path,)), responses((status = 200, description = "Updated"), (status = 403, description = "Not the organizer")))]
pub async fn update(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    Json(input): Json<EventRequest>,
) -> ApiResult<EventResponse> {
    let updated = event_service::update_event(&state.db, claims.email(), id, input).await?;
    Ok(Json(ApiResponse::ok("Event updated successfully", updated)))
}

#[utoipa::path(delete, path = "/events/{id}", tag = "events", params(("id" = i64, Path,)), responses((status = 200, description = "Deleted"), (status = 403, description = "Not the organizer")))]
pub async fn delete(State(state): State<ServerState>, Extension(claims): Extension<Claims>, Path(id): Path<i64>) -> ApiResult<()> {
    event_service::delete_event(&state.db, claims.email(), id).await?;
    Ok(Json(ApiResponse::done("Event deleted successfully")))
}

#[utoipa::path(get, path = "/events", tag = "events", responses((status = 200, description = "Active events, latest first")))]
pub async fn list(State(state): State<ServerState>, claims: Option<Extension<Claims>>) -> ApiResult<Vec<EventResponse>> {
    let found = event_service::get_all_events(&state.db, viewer(&claims)).await?;
    Ok(Json(ApiResponse::ok("Events retrieved successfully", found)))
}

#[utoipa::path(get, path = "/events/upcoming", tag = "events", responses((status = 200, description = "Future events, soonest first")))]
pub async fn upcoming(State(state): State<ServerState>, claims: Option<Extension<Claims>>) -> ApiResult<Vec<EventResponse>> {
    let found = event_service::get_upcoming_events(&state.db, viewer(&claims)).await?;
    Ok(Json(ApiResponse::ok("Upcoming events retrieved successfully", found)))
}

#[utoipa::path(get, path = "/events/past", tag = "events", responses((status = 200, description = "Past events, latest first")))]
pub async fn past(State(state): State<ServerState>, claims: Option<Extension<Claims>>) -> ApiResult<Vec<EventResponse>> {
    let found = event_service::get_past_events(&state.db, viewer(&claims)).await?;
    Ok(Json(ApiResponse::ok("Past events retrieved successfully", found)))
}

#[utoipa::path(get, path = "/events/my-events", tag = "events", responses((status = 200, description = "Events organised by the caller")))]
pub async fn mine(State(state): State<ServerState>, Extension(claims): Extension<Claims>) -> ApiResult<Vec<EventResponse>> {
    let found = event_service::get_my_events(&state.db, claims.email()).await?;
    Ok(Json(ApiResponse::ok("Your events retrieved successfully", found)))
}

#[utoipa::path(get, path = "/events/{id}", tag = "events", params(("id" = i64, Path,)), responses((status = 200, description = "Event"), (status = 404, description = "Event not found")))]
pub async fn get(State(state): State<ServerState>, claims: Option<Extension<Claims>>, Path(id): Path<i64>) -> ApiResult<EventResponse> {
    let found = event_service::get_event_by_id(&state.db, id, viewer(&claims)).await?;
    Ok(Json(ApiResponse::ok("Event retrieved successfully", found)))
}

#[utoipa::path(post, path = "/events/{id}/register", tag = "events", params(("id" = i64, Path,)), responses((status = 200, description = "Registered"), (status = 400, description = "Already registered or full")))]
pub async fn register(State(state): State<ServerState>, Extension(claims): Extension<Claims>, Path(id): Path<i64>) -> ApiResult<()> {
    event_service::register_for_event(&state.db, claims.email(), id).await?;
    Ok(Json(ApiResponse::done("Successfully registered for event")))
}

#[utoipa::path(delete, path = "/events/{id}/register", tag = "events", params(("id" = i64, Path,)), responses((status = 200, description = "Cancelled"), (status = 404, description = "Registration not found")))]
pub async fn cancel_registration(State(state): State<ServerState>, Extension(claims): Extension<Claims>, Path(id): Path<i64>) -> ApiResult<()> {
    event_service::cancel_registration(&state.db, claims.email(), id).await?;
    Ok(Json(ApiResponse::done("Registration cancelled successfully")))
}
