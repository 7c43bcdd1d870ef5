use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::{openapi::ApiDoc, state::ServerState};

pub mod ads;
pub mod categories;
pub mod locations;
pub mod users;

/// Upload limit applied when the caller does not pass one.
pub const DEFAULT_BODY_LIMIT: usize = 10 * 1024 * 1024;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

/// `?page=N`; kept as text so junk values fall back to page 1.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct PageQuery {
    pub page: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn ok() -> Self { Self { status: "ok".into() } }
}

fn api_routes() -> Router<ServerState> {
    let ad_routes = Router::new()
        .route("/ad/", get(ads::list))
        .route("/ad/create/", post(ads::create))
        .route("/ad/:id/", get(ads::detail))
        .route("/ad/:id/update/", patch(ads::update))
        .route("/ad/:id/upload_image/", post(ads::upload_image))
        .route("/ad/:id/delete/", delete(ads::delete));

    let user_routes = Router::new()
        .route("/user/", get(users::list))
        .route("/user/create/", post(users::create))
        .route("/user/:id/", get(users::detail))
        .route("/user/:id/update/", patch(users::update))
        .route("/user/:id/delete/", delete(users::delete));

    let category_routes = Router::new()
        .route("/cat/", get(categories::list))
        .route("/cat/create/", post(categories::create))
        .route("/cat/:id/", get(categories::detail))
        .route("/cat/:id/update/", patch(categories::update))
        .route("/cat/:id/delete/", delete(categories::delete));

    let location_routes = Router::new()
        .route("/location/", get(locations::list))
        .route("/location/create/", post(locations::create))
        .route("/location/:id/", get(locations::detail))
        .route("/location/:id/update/", patch(locations::update))
        .route("/location/:id/delete/", delete(locations::delete));

    ad_routes.merge(user_routes).merge(category_routes).merge(location_routes)
}

/// Build the full application router with the default body limit.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    build_router_with_limit(state, cors, DEFAULT_BODY_LIMIT)
}

pub fn build_router_with_limit(state: ServerState, cors: CorsLayer, body_limit: usize) -> Router {
    let media = ServeDir::new(state.media_root.clone());

    let public = Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .nest_service("/media", media);

    public
        .merge(api_routes())
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx at ERROR
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
