use axum::{
    extract::State,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use models::location;
use service::{
    errors::ServiceError,
    locations::{self, LocationChanges},
};

use crate::{
    errors::{JsonApiError, JsonBody, PathId},
    routes::StatusResponse,
    state::ServerState,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct LocationDto {
    pub id: i32,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

impl From<location::Model> for LocationDto {
    fn from(m: location::Model) -> Self { Self { id: m.id, name: m.name, lat: m.lat, lng: m.lng } }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLocationRequest {
    pub name: String,
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lng: f64,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateLocationRequest {
    pub name: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

#[utoipa::path(get, path = "/location/", tag = "locations", responses((status = 200, description = "All locations", body = [LocationDto])))]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<LocationDto>>, JsonApiError> {
    let rows = locations::list_locations(&state.db).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get, path = "/location/{id}/", tag = "locations",
    params(("id" = i32, Path, description = "Location id")),
    responses((status = 200, description = "Location", body = LocationDto), (status = 404, description = "Not Found"))
)]
pub async fn detail(State(state): State<ServerState>, PathId(id): PathId) -> Result<Json<LocationDto>, JsonApiError> {
    let found = locations::get_location(&state.db, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("location", id))?;
    Ok(Json(found.into()))
}

#[utoipa::path(
    post, path = "/location/create/", tag = "locations",
    request_body = CreateLocationRequest,
    responses(
        (status = 200, description = "Created", body = LocationDto),
        (status = 400, description = "Coordinates out of range"),
        (status = 409, description = "Name taken")
    )
)]
pub async fn create(State(state): State<ServerState>, JsonBody(input): JsonBody<CreateLocationRequest>) -> Result<Json<LocationDto>, JsonApiError> {
    let created = locations::create_location(&state.db, &input.name, input.lat, input.lng).await?;
    Ok(Json(created.into()))
}

#[utoipa::path(
    patch, path = "/location/{id}/update/", tag = "locations",
    params(("id" = i32, Path, description = "Location id")),
    request_body = UpdateLocationRequest,
    responses((status = 200, description = "Updated", body = LocationDto), (status = 404, description = "Not Found"))
)]
pub async fn update(
    State(state): State<ServerState>,
    PathId(id): PathId,
    JsonBody(input): JsonBody<UpdateLocationRequest>,
) -> Result<Json<LocationDto>, JsonApiError> {
    let changes = LocationChanges { name: input.name, lat: input.lat, lng: input.lng };
    let updated = locations::update_location(&state.db, id, changes).await?;
    Ok(Json(updated.into()))
}

#[utoipa::path(
    delete, path = "/location/{id}/delete/", tag = "locations",
    params(("id" = i32, Path, description = "Location id")),
    responses((status = 200, description = "Deleted", body = StatusResponse), (status = 404, description = "Not Found"))
)]
pub async fn delete(State(state): State<ServerState>, PathId(id): PathId) -> Result<Json<StatusResponse>, JsonApiError> {
    locations::delete_location(&state.db, id).await?;
    Ok(Json(StatusResponse::ok()))
}
