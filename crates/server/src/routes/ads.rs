use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use models::ad;
use service::{
    ads::{self, AdChanges, AdRecord, NewAd},
    errors::ServiceError,
};

use crate::{
    errors::{JsonApiError, JsonBody, PathId},
    routes::{PageQuery, StatusResponse},
    state::ServerState,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct AdListItem {
    pub id: i32,
    pub name: String,
    pub author_id: i32,
    pub price: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdListResponse {
    pub total: u64,
    pub num_pages: u64,
    pub items: Vec<AdListItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdDetail {
    pub id: i32,
    pub name: String,
    pub author: i32,
    pub price: i32,
    pub desc: Option<String>,
    pub image: Option<String>,
    pub category: Option<i32>,
    pub is_published: bool,
}

impl From<ad::Model> for AdDetail {
    fn from(m: ad::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            author: m.author_id,
            price: m.price,
            desc: m.description,
            image: m.image,
            category: m.category_id,
            is_published: m.is_published,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAdRequest {
    pub name: String,
    pub author: i32,
    #[serde(default)]
    pub price: i32,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub category: Option<i32>,
    #[serde(default)]
    pub is_published: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateAdResponse {
    pub id: i32,
    pub name: String,
    pub author_id: i32,
    pub price: i32,
    pub desc: Option<String>,
    pub category_id: Option<i32>,
    pub is_published: bool,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateAdRequest {
    pub name: Option<String>,
    pub author_id: Option<i32>,
    pub price: Option<i32>,
    pub desc: Option<String>,
    pub category_id: Option<i32>,
    pub is_published: Option<bool>,
}

/// Returned by update and image upload.
#[derive(Debug, Serialize, ToSchema)]
pub struct AdUpdateResponse {
    pub id: i32,
    pub name: String,
    pub author_id: i32,
    /// author's username
    pub author: String,
    pub price: i32,
    pub desc: Option<String>,
    pub is_published: bool,
    pub category_id: Option<i32>,
    pub image: Option<String>,
}

impl From<AdRecord> for AdUpdateResponse {
    fn from(r: AdRecord) -> Self {
        Self {
            id: r.ad.id,
            name: r.ad.name,
            author_id: r.ad.author_id,
            author: r.author.username,
            price: r.ad.price,
            desc: r.ad.description,
            is_published: r.ad.is_published,
            category_id: r.ad.category_id,
            image: r.ad.image,
        }
    }
}

#[utoipa::path(
    get, path = "/ad/", tag = "ads",
    params(PageQuery),
    responses((status = 200, description = "Page of ads", body = AdListResponse))
)]
pub async fn list(State(state): State<ServerState>, Query(q): Query<PageQuery>) -> Result<Json<AdListResponse>, JsonApiError> {
    let page = ads::list_ads(&state.db, q.page.as_deref(), state.total_on_page).await?;
    let items = page
        .items
        .into_iter()
        .map(|a| AdListItem { id: a.id, name: a.name, author_id: a.author_id, price: a.price })
        .collect();
    Ok(Json(AdListResponse { total: page.total, num_pages: page.num_pages, items }))
}

#[utoipa::path(
    get, path = "/ad/{id}/", tag = "ads",
    params(("id" = i32, Path, description = "Ad id")),
    responses((status = 200, description = "Ad", body = AdDetail), (status = 404, description = "Not Found"))
)]
pub async fn detail(State(state): State<ServerState>, PathId(id): PathId) -> Result<Json<AdDetail>, JsonApiError> {
    let found = ads::get_ad(&state.db, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("ad", id))?;
    Ok(Json(found.into()))
}

#[utoipa::path(
    post, path = "/ad/create/", tag = "ads",
    request_body = CreateAdRequest,
    responses(
        (status = 200, description = "Created", body = CreateAdResponse),
        (status = 400, description = "Validation Error or unknown author/category")
    )
)]
pub async fn create(State(state): State<ServerState>, JsonBody(input): JsonBody<CreateAdRequest>) -> Result<Json<CreateAdResponse>, JsonApiError> {
    let created = ads::create_ad(&state.db, NewAd {
        name: input.name,
        author_id: input.author,
        price: input.price,
        description: input.desc,
        category_id: input.category,
        is_published: input.is_published,
    })
    .await?;
    info!(id = created.id, "created ad");
    Ok(Json(CreateAdResponse {
        id: created.id,
        name: created.name,
        author_id: created.author_id,
        price: created.price,
        desc: created.description,
        category_id: created.category_id,
        is_published: created.is_published,
    }))
}

#[utoipa::path(
    patch, path = "/ad/{id}/update/", tag = "ads",
    params(("id" = i32, Path, description = "Ad id")),
    request_body = UpdateAdRequest,
    responses(
        (status = 200, description = "Updated", body = AdUpdateResponse),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    PathId(id): PathId,
    JsonBody(input): JsonBody<UpdateAdRequest>,
) -> Result<Json<AdUpdateResponse>, JsonApiError> {
    let changes = AdChanges {
        name: input.name,
        author_id: input.author_id,
        price: input.price,
        description: input.desc,
        category_id: input.category_id,
        is_published: input.is_published,
    };
    let rec = ads::update_ad(&state.db, id, changes).await?;
    Ok(Json(rec.into()))
}

#[utoipa::path(
    post, path = "/ad/{id}/upload_image/", tag = "ads",
    params(("id" = i32, Path, description = "Ad id")),
    request_body(content = String, content_type = "multipart/form-data", description = "file in field `image`"),
    responses(
        (status = 200, description = "Image attached", body = AdUpdateResponse),
        (status = 400, description = "Missing `image` field"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn upload_image(
    State(state): State<ServerState>,
    PathId(id): PathId,
    mut multipart: Multipart,
) -> Result<Json<AdUpdateResponse>, JsonApiError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| JsonApiError::bad_request(e.to_string()))?
    {
        if field.name() != Some("image") {
            continue;
        }
        let filename = field.file_name().unwrap_or("upload").to_string();
        let bytes = field.bytes().await.map_err(|e| JsonApiError::bad_request(e.to_string()))?;
        upload = Some((filename, bytes));
        break;
    }
    let (filename, bytes) = upload.ok_or_else(|| JsonApiError::bad_request("multipart field `image` is required"))?;
    if bytes.is_empty() {
        return Err(JsonApiError::bad_request("uploaded image is empty"));
    }

    let rec = ads::set_ad_image(&state.db, state.images.as_ref(), id, &filename, &bytes).await?;
    Ok(Json(rec.into()))
}

#[utoipa::path(
    delete, path = "/ad/{id}/delete/", tag = "ads",
    params(("id" = i32, Path, description = "Ad id")),
    responses((status = 200, description = "Deleted", body = StatusResponse), (status = 404, description = "Not Found"))
)]
pub async fn delete(State(state): State<ServerState>, PathId(id): PathId) -> Result<Json<StatusResponse>, JsonApiError> {
    ads::delete_ad(&state.db, id).await?;
    Ok(Json(StatusResponse::ok()))
}
