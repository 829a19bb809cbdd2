use utoipa::OpenApi;

pub const USER_TAG: &str = "User";
pub const HEALTH_TAG: &str = "Health";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "User API",
        description = "User management service with filtered, paginated listing",
    ),
    components(
        schemas(
            crate::api::dto::ErrorResponse,
            crate::api::dto::PageMeta,
            crate::api::dto::MessageResponse,
        )
    ),
    tags(
        (name = USER_TAG, description = "User management endpoints"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;
