use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use common::types::ApiResponse;
use service::auth::token::Claims;
use service::company_service::{self, CompanyRequest, CompanyResponse};

use crate::{errors::ApiError, routes::auth::ServerState};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct CompanyTypeQuery {
    pub company_type: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct KeywordQuery {
    #[serde(default)]
    pub keyword: String,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct OfferingQuery {
    #[serde(default)]
    pub offering: String,
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

#[utoipa::path(post, path = "/companies", tag = "companies", request_body = crate::openapi::CompanyRequestDoc, responses((status = 201, description = "Created"), (status = 400, description = "Validation Error")))]
pub async fn create(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Json(input): Json<CompanyRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CompanyResponse>>), ApiError> {
    let created = company_service::create_company(&state.db, claims.email(), input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok("Company created successfully", created))))
}

#[utoipa::path(put, path = "/companies/{id}", tag = "companies", request_body = crate::openapi::CompanyRequestDoc, params(("id" = i64, Path,)), responses((status = 200, description = "Updated"), (status = 403, description = "Not the owner"), (status = 404, description = "Not found")))]
pub async fn update(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    Json(input): Json<CompanyRequest>,
) -> ApiResult<CompanyResponse> {
    let updated = company_service::update_company(&state.db, claims.email(), id, input).await?;
    Ok(Json(ApiResponse::ok("Company updated successfully", updated)))
}

#[utoipa::path(get, path = "/companies/my-company", tag = "companies", responses((status = 200, description = "Own company"), (status = 404, description = "No company yet")))]
pub async fn my_company(State(state): State<ServerState>, Extension(claims): Extension<Claims>) -> ApiResult<CompanyResponse> {
    let found = company_service::get_my_company(&state.db, claims.email()).await?;
    Ok(Json(ApiResponse::ok("Company retrieved successfully", found)))
}

#[utoipa::path(get, path = "/companies", tag = "companies", params(CompanyTypeQuery), responses((status = 200, description = "Active companies")))]
pub async fn list(State(state): State<ServerState>, Query(q): Query<CompanyTypeQuery>) -> ApiResult<Vec<CompanyResponse>> {
    let found = company_service::get_all_companies(&state.db, q.company_type.as_deref()).await?;
    Ok(Json(ApiResponse::ok("Companies retrieved successfully", found)))
}

#[utoipa::path(get, path = "/companies/public/{id}", tag = "companies", params(("id" = i64, Path,)), responses((status = 200, description = "Company"), (status = 404, description = "Not found")))]
pub async fn get_public(State(state): State<ServerState>, Path(id): Path<i64>) -> ApiResult<CompanyResponse> {
    let found = company_service::get_company_by_id(&state.db, id).await?;
    Ok(Json(ApiResponse::ok("Company retrieved successfully", found)))
}

#[utoipa::path(get, path = "/companies/search", tag = "companies", params(KeywordQuery), responses((status = 200, description = "Matches")))]
pub async fn search(State(state): State<ServerState>, Query(q): Query<KeywordQuery>) -> ApiResult<Vec<CompanyResponse>> {
    let found = company_service::search_companies(&state.db, &q.keyword).await?;
    Ok(Json(ApiResponse::ok("Search results", found)))
}

#[utoipa::path(get, path = "/companies/search/offering", tag = "companies", params(OfferingQuery), responses((status = 200, description = "Matches")))]
pub async fn search_by_offering(State(state): State<ServerState>, Query(q): Query<OfferingQuery>) -> ApiResult<Vec<CompanyResponse>> {
    let found = company_service::search_by_offering(&state.db, &q.offering).await?;
    Ok(Json(ApiResponse::ok("Search results", found)))
}

#[utoipa::path(delete, path = "/companies/{id}", tag = "companies", params(("id" = i64, Path,)), responses((status = 200, description = "Deleted"), (status = 403, description = "Not the owner")))]
pub async fn delete(State(state): State<ServerState>, Extension(claims): Extension<Claims>, Path(id): Path<i64>) -> ApiResult<()> {
    company_service::delete_company(&state.db, claims.email(), id).await?;
    Ok(Json(ApiResponse::done("Company deleted successfully")))
}
