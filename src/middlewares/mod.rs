pub mod rate_limit;
pub mod require_jwt;
pub mod require_role;

use actix_web::HttpResponse;
use actix_web::http::StatusCode;

use crate::models::{ApiResponse, ErrorCode};

pub use rate_limit::RateLimit;
pub use require_jwt::RequireJWT;
pub use require_role::RequireRole;

/// 中间件统一的错误响应
pub(crate) fn create_error_response(status: StatusCode, code: ErrorCode, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(ApiResponse::error_empty(code, message))
}
