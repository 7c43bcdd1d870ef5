use axum::{
    extract::State,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use models::category;
use service::{categories, errors::ServiceError};

use crate::{
    errors::{JsonApiError, JsonBody, PathId},
    routes::StatusResponse,
    state::ServerState,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryDto {
    pub id: i32,
    pub name: String,
}

impl From<category::Model> for CategoryDto {
    fn from(m: category::Model) -> Self { Self { id: m.id, name: m.name } }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CategoryInput {
    pub name: String,
}

#[utoipa::path(get, path = "/cat/", tag = "categories", responses((status = 200, description = "All categories", body = [CategoryDto])))]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<CategoryDto>>, JsonApiError> {
    let rows = categories::list_categories(&state.db).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get, path = "/cat/{id}/", tag = "categories",
    params(("id" = i32, Path, description = "Category id")),
    responses((status = 200, description = "Category", body = CategoryDto), (status = 404, description = "Not Found"))
)]
pub async fn detail(State(state): State<ServerState>, PathId(id): PathId) -> Result<Json<CategoryDto>, JsonApiError> {
    let found = categories::get_category(&state.db, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("category", id))?;
    Ok(Json(found.into()))
}

#[utoipa::path(
    post, path = "/cat/create/", tag = "categories",
    request_body = CategoryInput,
    responses((status = 200, description = "Created", body = CategoryDto), (status = 409, description = "Name taken"))
)]
pub async fn create(State(state): State<ServerState>, JsonBody(input): JsonBody<CategoryInput>) -> Result<Json<CategoryDto>, JsonApiError> {
    let created = categories::create_category(&state.db, &input.name).await?;
    Ok(Json(created.into()))
}

#[utoipa::path(
    patch, path = "/cat/{id}/update/", tag = "categories",
    params(("id" = i32, Path, description = "Category id")),
    request_body = CategoryInput,
    responses((status = 200, description = "Renamed", body = CategoryDto), (status = 404, description = "Not Found"))
)]
pub async fn update(
    State(state): State<ServerState>,
    PathId(id): PathId,
    JsonBody(input): JsonBody<CategoryInput>,
) -> Result<Json<CategoryDto>, JsonApiError> {
    let renamed = categories::rename_category(&state.db, id, &input.name).await?;
    Ok(Json(renamed.into()))
}

#[utoipa::path(
    delete, path = "/cat/{id}/delete/", tag = "categories",
    params(("id" = i32, Path, description = "Category id")),
    responses((status = 200, description = "Deleted", body = StatusResponse), (status = 404, description = "Not Found"))
)]
pub async fn delete(State(state): State<ServerState>, PathId(id): PathId) -> Result<Json<StatusResponse>, JsonApiError> {
    categories::delete_category(&state.db, id).await?;
    Ok(Json(StatusResponse::ok()))
}
