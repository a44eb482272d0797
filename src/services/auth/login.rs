use actix_web::http::header::USER_AGENT;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use crate::models::{
    ApiResponse, ErrorCode,
    auth::{LoginRequest, LoginResponse},
    system::NewConnectionLog,
};
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use crate::utils::password::verify_password;

use super::AuthService;

const INVALID_CREDENTIALS: &str = "Email or password is incorrect";

// 登录日志写入失败不影响登录结果
async fn record_attempt(
    storage: &dyn Storage,
    request: &HttpRequest,
    email: &str,
    user_id: Option<i64>,
    success: bool,
) {
    let user_agent = request
        .headers()
        .get(USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let ip_address = request
        .connection_info()
        .realip_remote_addr()
        .map(str::to_string);

    let log = NewConnectionLog {
        user_id,
        email: email.to_string(),
        success,
        ip_address,
        user_agent,
    };
    if let Err(e) = storage.create_connection_log(log).await {
        warn!("Failed to record connection log for {}: {}", email, e);
    }
}

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let config = service.get_config();
    let email = login_request.email.trim().to_lowercase();

    // 1. 按邮箱查找可登录的账号（学生没有密码，不会被查到）
    let user = match storage.get_login_user_by_email(&email).await {
        Ok(user) => user,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Login failed: {e}"),
                )),
            );
        }
    };

    // 2. 验证密码
    let Some(user) = user.filter(|u| {
        u.password_hash
            .as_deref()
            .is_some_and(|hash| verify_password(&login_request.password, hash))
    }) else {
        info!("Login failed for {}", email);
        record_attempt(storage.as_ref(), request, &email, None, false).await;
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::AuthFailed,
            INVALID_CREDENTIALS,
        )));
    };

    // 3. 更新最后登录时间并记录日志
    if let Err(e) = storage.update_last_login(user.id).await {
        warn!("Failed to update last login for user {}: {}", user.id, e);
    }
    record_attempt(storage.as_ref(), request, &email, Some(user.id), true).await;

    // 4. 生成令牌对
    let refresh_ttl = JwtUtils::refresh_ttl(login_request.remember_me);
    match user.generate_token_pair(Some(refresh_ttl)) {
        Ok(token_pair) => {
            info!("User {} ({}) logged in successfully", user.id, user.role);

            let refresh_cookie =
                JwtUtils::refresh_token_cookie(&token_pair.refresh_token, token_pair.refresh_ttl);
            let response = LoginResponse {
                access_token: token_pair.access_token,
                expires_in: config.jwt.access_token_expiry * 60,
                user,
                created_at: chrono::Utc::now(),
            };

            Ok(HttpResponse::Ok()
                .cookie(refresh_cookie)
                .json(ApiResponse::success(response, "Login successful")))
        }
        Err(e) => {
            tracing::error!("Failed to generate JWT token: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Login failed, unable to generate token",
                )),
            )
        }
    }
}
