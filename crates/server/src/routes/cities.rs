use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use common::types::ApiResponse;
use service::city_service::{self, CityResponse};

use crate::{errors::ApiError, routes::auth::ServerState};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct CityQuery {
    pub city_name: String,
}

#[utoipa::path(get, path = "/cities", tag = "cities", responses((status = 200, description = "Active cities")))]
pub async fn list(State(state): State<ServerState>) -> Result<Json<ApiResponse<Vec<CityResponse>>>, ApiError> {
    let found = city_service::get_all_cities(&state.db).await?;
    Ok(Json(ApiResponse::ok("Cities retrieved successfully", found)))
}

#[utoipa::path(post, path = "/cities", tag = "cities", params(CityQuery), responses((status = 200, description = "Added"), (status = 400, description = "City already exists")))]
pub async fn add(State(state): State<ServerState>, Query(q): Query<CityQuery>) -> Result<Json<ApiResponse<CityResponse>>, ApiError> {
    let created = city_service::add_city(&state.db, &q.city_name).await?;
    Ok(Json(ApiResponse::ok("City added successfully", created)))
}

#[utoipa::path(delete, path = "/cities/{id}", tag = "cities", params(("id" = i64, Path,)), responses((status = 200, description = "Deactivated"), (status = 404, description = "City not found")))]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<i64>) -> Result<Json<ApiResponse<()>>, ApiError> {
    city_service::delete_city(&state.db, id).await?;
    Ok(Json(ApiResponse::done("City deleted successfully")))
}
