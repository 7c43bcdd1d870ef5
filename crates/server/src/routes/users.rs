use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use service::{
    errors::ServiceError,
    users::{self, NewUser, UserChanges, UserRecord},
};

use crate::{
    errors::{JsonApiError, JsonBody, PathId},
    routes::{PageQuery, StatusResponse},
    state::ServerState,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct UserListItem {
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub age: Option<i32>,
    pub locations: Option<String>,
    pub total_ads: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserListResponse {
    pub total: u64,
    pub num_pages: u64,
    pub items: Vec<UserListItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserDetail {
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub age: Option<i32>,
    pub locations: Option<String>,
}

impl From<UserRecord> for UserDetail {
    fn from(r: UserRecord) -> Self {
        let locations = r.location_name().map(str::to_string);
        Self {
            id: r.user.id,
            username: r.user.username,
            first_name: r.user.first_name,
            last_name: r.user.last_name,
            role: r.user.role,
            age: r.user.age,
            locations,
        }
    }
}

/// Update echoes everything but the role.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserUpdateResponse {
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub age: Option<i32>,
    pub locations: Option<String>,
}

impl From<UserRecord> for UserUpdateResponse {
    fn from(r: UserRecord) -> Self {
        let locations = r.location_name().map(str::to_string);
        Self {
            id: r.user.id,
            username: r.user.username,
            first_name: r.user.first_name,
            last_name: r.user.last_name,
            age: r.user.age,
            locations,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub age: Option<i32>,
    /// location name
    #[serde(default)]
    pub locations: Option<String>,
    pub password: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
    pub age: Option<i32>,
    pub locations: Option<String>,
    pub role: Option<String>,
}

#[utoipa::path(
    get, path = "/user/", tag = "users",
    params(PageQuery),
    responses((status = 200, description = "Page of users", body = UserListResponse))
)]
pub async fn list(State(state): State<ServerState>, Query(q): Query<PageQuery>) -> Result<Json<UserListResponse>, JsonApiError> {
    let page = users::list_users(&state.db, q.page.as_deref(), state.total_on_page).await?;
    let items = page
        .items
        .into_iter()
        .map(|s| UserListItem {
            id: s.user.id,
            username: s.user.username,
            first_name: s.user.first_name,
            last_name: s.user.last_name,
            role: s.user.role,
            age: s.user.age,
            locations: s.location_name,
            total_ads: s.total_ads,
        })
        .collect();
    Ok(Json(UserListResponse { total: page.total, num_pages: page.num_pages, items }))
}

#[utoipa::path(
    get, path = "/user/{id}/", tag = "users",
    params(("id" = i32, Path, description = "User id")),
    responses((status = 200, description = "User", body = UserDetail), (status = 404, description = "Not Found"))
)]
pub async fn detail(State(state): State<ServerState>, PathId(id): PathId) -> Result<Json<UserDetail>, JsonApiError> {
    let rec = users::get_user(&state.db, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("user", id))?;
    Ok(Json(rec.into()))
}

#[utoipa::path(
    post, path = "/user/create/", tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "Created", body = UserDetail),
        (status = 400, description = "Validation Error"),
        (status = 409, description = "Username taken")
    )
)]
pub async fn create(State(state): State<ServerState>, JsonBody(input): JsonBody<CreateUserRequest>) -> Result<Json<UserDetail>, JsonApiError> {
    let rec = users::create_user(&state.db, NewUser {
        username: input.username,
        first_name: input.first_name,
        last_name: input.last_name,
        role: input.role,
        age: input.age,
        location: input.locations,
        password: input.password,
    })
    .await?;
    info!(id = rec.user.id, "created user");
    Ok(Json(rec.into()))
}

#[utoipa::path(
    patch, path = "/user/{id}/update/", tag = "users",
    params(("id" = i32, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated", body = UserUpdateResponse),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    PathId(id): PathId,
    JsonBody(input): JsonBody<UpdateUserRequest>,
) -> Result<Json<UserUpdateResponse>, JsonApiError> {
    let changes = UserChanges {
        username: input.username,
        first_name: input.first_name,
        last_name: input.last_name,
        role: input.role,
        age: input.age,
        location: input.locations,
        password: input.password,
    };
    let rec = users::update_user(&state.db, id, changes).await?;
    Ok(Json(rec.into()))
}

#[utoipa::path(
    delete, path = "/user/{id}/delete/", tag = "users",
    params(("id" = i32, Path, description = "User id")),
    responses((status = 200, description = "Deleted", body = StatusResponse), (status = 404, description = "Not Found"))
)]
pub async fn delete(State(state): State<ServerState>, PathId(id): PathId) -> Result<Json<StatusResponse>, JsonApiError> {
    users::delete_user(&state.db, id).await?;
    Ok(Json(StatusResponse::ok()))
}
