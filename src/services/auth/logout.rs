use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use crate::cache::{ObjectCache, keys};
use crate::models::ApiResponse;
use crate::utils::jwt::JwtUtils;

const BEARER_PREFIX: &str = "Bearer ";

/// 登出：下发过期的 refresh_token cookie，并清掉该 access token 对应的用户缓存
pub async fn handle_logout(request: HttpRequest) -> ActixResult<HttpResponse> {
    let token = request
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|s| !s.is_empty());

    if let (Some(token), Some(cache)) = (
        token,
        request.app_data::<web::Data<Arc<dyn ObjectCache>>>(),
    ) {
        cache.remove(&keys::user_by_token(token)).await;
    }

    Ok(HttpResponse::Ok()
        .cookie(JwtUtils::expired_refresh_token_cookie())
        .json(ApiResponse::success_empty("Logout successful")))
}
