use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "User Registry API",
        version = "1.0.0",
        description = "Registers users by name and age and lists every stored user."
    ),
    paths(
        crate::api::health::health_check,
        crate::api::users::add_user,
        crate::api::users::fetch_users,
    ),
    components(
        schemas(
            crate::api::health::HealthResponse,
            crate::api::users::MessageResponse,
            crate::api::users::ErrorResponse,
            crate::api::users::InternalErrorResponse,
            crate::services::user_service::AddUserRequest,
            crate::models::UserResponse,
        )
    ),
    tags(
        (name = "Health", description = "Liveness probe."),
        (name = "Users", description = "User registration and listing."),
    )
)]
pub struct ApiDoc;
