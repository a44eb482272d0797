use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::UserService;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, users::responses::UserResponse};

pub async fn delete_user(
    service: &UserService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if RequireJWT::extract_user_id(request) == Some(user_id) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::CanNotDeleteCurrentUser,
            "Cannot delete the current user",
        )));
    }

    let storage = service.get_storage(request);

    match storage.soft_delete_user(user_id).await {
        Ok(true) => {
            info!("User {} soft deleted", user_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("User deleted successfully")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::UserDeleteFailed,
                format!("User deletion failed: {e}"),
            )),
        ),
    }
}

pub async fn restore_user(
    service: &UserService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.restore_user(user_id).await {
        Ok(Some(user)) => {
            info!("User {} restored", user_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                UserResponse { user },
                "User restored successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::UserUpdateFailed,
                format!("User restore failed: {e}"),
            )),
        ),
    }
}
