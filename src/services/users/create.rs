use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::UserService;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{entities::UserRole, requests::CreateUserRequest, responses::UserResponse},
};
use crate::utils::password::hash_password;
use crate::utils::validate::{
    validate_email, validate_name, validate_password_simple, validate_phone,
};

/// 创建与更新共用的字段校验
pub(super) fn validate_profile(
    email: Option<&str>,
    firstname: Option<&str>,
    lastname: Option<&str>,
    phone: Option<&str>,
    secondary_email: Option<&str>,
) -> Result<(), (ErrorCode, &'static str)> {
    if let Some(email) = email {
        validate_email(email.trim()).map_err(|msg| (ErrorCode::UserEmailInvalid, msg))?;
    }
    if let Some(email) = secondary_email.filter(|e| !e.trim().is_empty()) {
        validate_email(email.trim()).map_err(|msg| (ErrorCode::UserEmailInvalid, msg))?;
    }
    for name in [firstname, lastname].into_iter().flatten() {
        validate_name(name).map_err(|msg| (ErrorCode::UserNameInvalid, msg))?;
    }
    if let Some(phone) = phone.filter(|p| !p.trim().is_empty()) {
        validate_phone(phone).map_err(|msg| (ErrorCode::BadRequest, msg))?;
    }
    Ok(())
}

pub async fn create_user(
    service: &UserService,
    mut user_data: CreateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err((code, msg)) = validate_profile(
        Some(&user_data.email),
        Some(&user_data.firstname),
        Some(&user_data.lastname),
        user_data.phone.as_deref(),
        user_data.secondary_email.as_deref(),
    ) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(code, msg)));
    }

    let storage = service.get_storage(request);

    // 学生不登录，不保存密码；其他角色必须设置符合策略的密码
    if user_data.role == UserRole::Student {
        user_data.password = None;
    } else {
        let Some(password) = user_data.password.as_deref() else {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::PasswordPolicyViolation,
                "Password is required for this role",
            )));
        };
        if let Err(msg) = validate_password_simple(password) {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::PasswordPolicyViolation,
                msg,
            )));
        }

        // 兄弟姐妹共用家庭邮箱，唯一性只约束可登录账号
        match storage.is_account_email_taken(&user_data.email, None).await {
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

        user_data.password = match hash_password(password) {
            Ok(hash) => Some(hash),
            Err(e) => {
                return Ok(
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::InternalServerError,
                        format!("Password hashing failed: {e}"),
                    )),
                );
            }
        };
    }

    match storage.create_user(user_data).await {
        Ok(user) => {
            info!("User {} created with role {}", user.id, user.role);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(UserResponse { user }, "User created")))
        }
        Err(e) if e.is_conflict() => Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::UserAlreadyExists,
            "Email is already used by another account",
        ))),
        Err(e) => {
            let msg = format!("User creation failed: {e}");
            error!("{}", msg);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::error_empty(ErrorCode::UserCreationFailed, msg)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_profile_accepts_optional_blanks() {
        assert!(
            validate_profile(
                Some("famille.benali@example.com"),
                Some("Inès"),
                Some("Ben Ali"),
                Some(""),
                Some("  "),
            )
            .is_ok()
        );
    }

    #[test]
    fn test_validate_profile_reports_field_code() {
        let err = validate_profile(Some("not-an-email"), None, None, None, None).unwrap_err();
        assert_eq!(err.0, ErrorCode::UserEmailInvalid);

        let err = validate_profile(None, Some("   "), None, None, None).unwrap_err();
        assert_eq!(err.0, ErrorCode::UserNameInvalid);

        let err = validate_profile(None, None, None, Some("abc"), None).unwrap_err();
        assert_eq!(err.0, ErrorCode::BadRequest);
    }
}
