//! JWT 认证中间件
//!
//! 读取 `Authorization: Bearer <token>`，校验 access token 后加载用户（先查缓存，再查存储），
//! 拒绝已停用或已软删除的账号，并把用户写入请求扩展供后续处理器使用：
//!
//! ```rust,ignore
//! web::scope("/api/v1/courses")
//!     .wrap(RequireJWT)
//!     .route("", web::get().to(list_courses))
//! ```
//!
//! 处理器内通过 [`RequireJWT::extract_user_claims`] / [`RequireJWT::extract_user_id`] 取当前用户。

use std::rc::Rc;
use std::sync::Arc;

use actix_service::{Service, Transform};
use actix_web::body::EitherBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::{Method, StatusCode};
use actix_web::{Error, HttpMessage, HttpRequest, HttpResponse, web};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{debug, info};

use super::create_error_response;
use crate::cache::{CacheResult, ObjectCache, ObjectCacheExt, keys};
use crate::models::ErrorCode;
use crate::models::users::entities::{User, UserRole};
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Clone)]
pub struct RequireJWT;

fn bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

async fn authenticate(req: &ServiceRequest, token: &str) -> Result<User, String> {
    let claims = JwtUtils::verify_access_token(token).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        "Invalid JWT token".to_string()
    })?;

    let cache = req
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone());
    let cache_key = keys::user_by_token(token);

    if let Some(cache) = &cache
        && let CacheResult::Found(user) = cache.get_json::<User>(&cache_key).await
    {
        return Ok(user);
    }

    let storage = req
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| "Storage is not configured".to_string())?;

    let user_id = claims
        .user_id()
        .ok_or_else(|| "Invalid user ID in JWT".to_string())?;

    let user = storage
        .get_user_by_id(user_id)
        .await
        .map_err(|e| format!("Failed to load user: {e}"))?
        .ok_or_else(|| "User not found".to_string())?;

    if !user.is_available() || !user.role.can_login() {
        return Err("User is not active".to_string());
    }

    if let Some(cache) = &cache {
        cache.insert_json(&cache_key, &user, 0).await;
    }
    Ok(user)
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    actix_service::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 预检请求直接放行给 CORS 处理
            if req.method() == Method::OPTIONS {
                return Ok(req.into_response(HttpResponse::NoContent().finish().map_into_right_body()));
            }

            let Some(token) = bearer_token(&req) else {
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::UNAUTHORIZED,
                        ErrorCode::Unauthorized,
                        "Missing or invalid Authorization header",
                    )
                    .map_into_right_body(),
                ));
            };

            match authenticate(&req, &token).await {
                Ok(user) => {
                    debug!("JWT authentication successful for user {}", user.id);
                    req.extensions_mut().insert(user);
                    Ok(srv.call(req).await?.map_into_left_body())
                }
                Err(err) => {
                    info!("JWT authentication failed for {}: {}", req.path(), err);
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            &format!("Unauthorized: {err}"),
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

impl RequireJWT {
    pub fn extract_user_claims(req: &HttpRequest) -> Option<User> {
        req.extensions().get::<User>().cloned()
    }

    pub fn extract_user_id(req: &HttpRequest) -> Option<i64> {
        req.extensions().get::<User>().map(|user| user.id)
    }

    pub fn extract_user_role(req: &HttpRequest) -> Option<UserRole> {
        req.extensions().get::<User>().map(|user| user.role.clone())
    }
}
