use actix_web::{web, HttpMessage, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    database::UserStore,
    models::UserResponse,
    services::user_service::{self, AddUserError, AddUserRequest},
};

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub msg: String,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct InternalErrorResponse {
    pub err: String,
}

fn message(msg: &str) -> MessageResponse {
    MessageResponse {
        msg: msg.to_string(),
    }
}

/// An empty body, or one that is not `application/json`, reads as `{}` so it
/// falls through to the required-fields check. A JSON array reads as `{}` too.
fn parse_add_user_body(
    req: &HttpRequest,
    body: &[u8],
) -> Result<AddUserRequest, serde_json::Error> {
    if body.is_empty() || !req.content_type().eq_ignore_ascii_case("application/json") {
        return Ok(AddUserRequest::default());
    }

    match serde_json::from_slice::<Value>(body)? {
        Value::Array(_) => Ok(AddUserRequest::default()),
        value => serde_json::from_value(value),
    }
}

/// POST /addUser - Cadastra um usuário novo
#[utoipa::path(
    post,
    path = "/addUser",
    tag = "Users",
    request_body = AddUserRequest,
    responses(
        (status = 201, description = "User created", body = MessageResponse),
        (status = 400, description = "Missing fields, or the name is taken", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = InternalErrorResponse)
    )
)]
pub async fn add_user(
    store: web::Data<dyn UserStore>,
    req: HttpRequest,
    body: web::Bytes,
) -> HttpResponse {
    log::info!("📝 POST /addUser");

    let request = match parse_add_user_body(&req, &body) {
        Ok(request) => request,
        Err(e) => {
            log::warn!("⚠️ Rejected request body: {}", e);
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Invalid JSON body.".to_string(),
            });
        }
    };

    match user_service::add_user(store.get_ref(), request).await {
        Ok(user) => {
            log::info!("✅ User added: {} ({})", user.name, user.id.to_hex());
            HttpResponse::Created().json(message("User Added Successfully"))
        }
        Err(e @ (AddUserError::MissingFields | AddUserError::AlreadyExists)) => {
            log::warn!("⚠️ User not added: {}", e);
            HttpResponse::BadRequest().json(ErrorResponse {
                error: e.to_string(),
            })
        }
        Err(e) => {
            log::error!("❌ Error adding user: {}", e);
            HttpResponse::InternalServerError().json(InternalErrorResponse {
                err: "Internal Server Error".to_string(),
            })
        }
    }
}

/// GET /fetchUser - Lista todos os usuários
#[utoipa::path(
    get,
    path = "/fetchUser",
    tag = "Users",
    responses(
        (status = 200, description = "Every stored user", body = Vec<UserResponse>),
        (status = 404, description = "No users stored yet", body = MessageResponse),
        (status = 500, description = "Storage failure", body = MessageResponse)
    )
)]
pub async fn fetch_users(store: web::Data<dyn UserStore>) -> HttpResponse {
    log::info!("📋 GET /fetchUser");

    match user_service::list_users(store.get_ref()).await {
        Ok(users) if users.is_empty() => {
            log::info!("ℹ️  No users found");
            HttpResponse::NotFound().json(message("No users found."))
        }
        Ok(users) => {
            log::info!("✅ Listed {} users", users.len());
            let body: Vec<UserResponse> = users.iter().map(UserResponse::from).collect();
            HttpResponse::Ok().json(body)
        }
        Err(e) => {
            log::error!("❌ Error listing users: {}", e);
            HttpResponse::InternalServerError().json(message("Something went wrong"))
        }
    }
}
