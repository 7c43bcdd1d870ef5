use utoipa::OpenApi;
use utoipa::ToSchema;

use crate::routes::{ads, categories, locations, users, StatusResponse};

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::ads::list,
        crate::routes::ads::detail,
        crate::routes::ads::create,
        crate::routes::ads::update,
        crate::routes::ads::upload_image,
        crate::routes::ads::delete,
        crate::routes::users::list,
        crate::routes::users::detail,
        crate::routes::users::create,
        crate::routes::users::update,
        crate::routes::users::delete,
        crate::routes::categories::list,
        crate::routes::categories::detail,
        crate::routes::categories::create,
        crate::routes::categories::update,
        crate::routes::categories::delete,
        crate::routes::locations::list,
        crate::routes::locations::detail,
        crate::routes::locations::create,
        crate::routes::locations::update,
        crate::routes::locations::delete,
    ),
    components(
        schemas(
            HealthResponse,
            StatusResponse,
            ads::AdListItem,
            ads::AdListResponse,
            ads::AdDetail,
            ads::CreateAdRequest,
            ads::CreateAdResponse,
            ads::UpdateAdRequest,
            ads::AdUpdateResponse,
            users::UserListItem,
            users::UserListResponse,
            users::UserDetail,
            users::UserUpdateResponse,
            users::CreateUserRequest,
            users::UpdateUserRequest,
            categories::CategoryDto,
            categories::CategoryInput,
            locations::LocationDto,
            locations::CreateLocationRequest,
            locations::UpdateLocationRequest,
        )
    ),
    tags(
        (name = "health"),
        (name = "ads"),
        (name = "users"),
        (name = "categories"),
        (name = "locations")
    )
)]
pub struct ApiDoc;
