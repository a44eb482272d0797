use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::UserService;
use super::create::validate_profile;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{entities::UserRole, requests::UpdateUserRequest, responses::UserResponse},
};
use crate::utils::password::hash_password;
use crate::utils::validate::validate_password_simple;

pub async fn update_user(
    service: &UserService,
    user_id: i64,
    mut update_data: UpdateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err((code, msg)) = validate_profile(
        update_data.email.as_deref(),
        update_data.firstname.as_deref(),
        update_data.lastname.as_deref(),
        update_data.phone.as_deref(),
        update_data.secondary_email.as_deref(),
    ) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(code, msg)));
    }

    let storage = service.get_storage(request);

    let existing = match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) => user,
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
                    format!("Failed to get user information: {e}"),
                )),
            );
        }
    };

    let role = update_data.role.clone().unwrap_or(existing.role.clone());
    if role == UserRole::Student {
        update_data.password = None;
    } else {
        // 改成可登录角色时必须已有或同时提供密码
        if update_data.password.is_none() && existing.password_hash.is_none() {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::PasswordPolicyViolation,
                "Password is required for this role",
            )));
        }

        let email = update_data
            .email
            .as_deref()
            .unwrap_or(&existing.email)
            .to_string();
        match storage.is_account_email_taken(&email, Some(user_id)).await {
            Ok(false) => {}
            Ok(true) => {
                return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                    ErrorCode::UserAlreadyExists,
                    "Email is already used by another account",
                )));
            }
            Err(e) => {
                return Ok(
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::InternalServerError,
                        format!("Failed to check email: {e}"),
                    )),
                );
            }
        }

        if let Some(password) = update_data.password.take() {
            if let Err(msg) = validate_password_simple(&password) {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::PasswordPolicyViolation,
                    msg,
                )));
            }
            match hash_password(&password) {
                Ok(hash) => update_data.password = Some(hash),
                Err(e) => {
                    return Ok(
                        HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                            ErrorCode::InternalServerError,
                            format!("Password hashing failed: {e}"),
                        )),
                    );
                }
            }
        }
    }

    match storage.update_user(user_id, update_data).await {
        Ok(Some(user)) => {
            info!("User {} updated", user_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                UserResponse { user },
                "User information updated successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(e) if e.is_conflict() => Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::UserAlreadyExists,
            "Email is already used by another account",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::UserUpdateFailed,
                format!("User update failed: {e}"),
            )),
        ),
    }
}
