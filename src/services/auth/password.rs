use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, auth::ChangePasswordRequest};
use crate::utils::password::{hash_password, verify_password};
use crate::utils::validate::validate_password_simple;

use super::AuthService;

pub async fn handle_change_password(
    service: &AuthService,
    password_request: ChangePasswordRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    if let Err(msg) = validate_password_simple(&password_request.new_password) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::PasswordPolicyViolation,
            msg,
        )));
    }

    // 缓存中的用户不含密码哈希，从存储重新读取
    let storage = service.get_storage(request);
    let current_hash = match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) => user.password_hash,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "User not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to load user: {e}"),
                )),
            );
        }
    };

    let verified = current_hash
        .as_deref()
        .is_some_and(|hash| verify_password(&password_request.current_password, hash));
    if !verified {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::AuthFailed,
            "Current password is incorrect",
        )));
    }

    let new_hash = match hash_password(&password_request.new_password) {
        Ok(hash) => hash,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Password hashing failed: {e}"),
                )),
            );
        }
    };

    match storage.update_password(user_id, &new_hash).await {
        Ok(true) => {
            info!("User {} changed password", user_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Password updated")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to update password: {e}"),
            )),
        ),
    }
}
