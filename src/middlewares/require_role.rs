//! 角色校验中间件，必须挂在 [`RequireJWT`](super::RequireJWT) 之后
//!
//! ```rust,ignore
//! .route("", web::post().to(create_user).wrap(RequireRole::new_any(UserRole::admin_roles())))
//! ```

use std::rc::Rc;

use actix_service::{Service, Transform};
use actix_web::body::EitherBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{Error, HttpMessage};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::info;

use super::create_error_response;
use crate::models::ErrorCode;
use crate::models::users::entities::{User, UserRole};

#[derive(Clone)]
pub struct RequireRole {
    allowed: Rc<[UserRole]>,
}

impl RequireRole {
    pub fn new(role: &UserRole) -> Self {
        Self::new_any(&[role])
    }

    /// 具备其中任一角色即可
    pub fn new_any(roles: &[&UserRole]) -> Self {
        Self {
            allowed: roles.iter().map(|r| (*r).clone()).collect(),
        }
    }

    fn permits(allowed: &[UserRole], role: &UserRole) -> bool {
        allowed.contains(role)
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            allowed: self.allowed.clone(),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    allowed: Rc<[UserRole]>,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
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
        let allowed = self.allowed.clone();

        Box::pin(async move {
            let caller = req
                .extensions()
                .get::<User>()
                .map(|user| (user.id, user.role.clone()));

            match caller {
                Some((_, role)) if RequireRole::permits(&allowed, &role) => {
                    Ok(srv.call(req).await?.map_into_left_body())
                }
                Some((user_id, role)) => {
                    info!(
                        "Access denied for user {} (role: {}). Allowed roles: {:?}",
                        user_id, role, allowed
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::FORBIDDEN,
                            ErrorCode::Forbidden,
                            "Access denied",
                        )
                        .map_into_right_body(),
                    ))
                }
                None => {
                    info!("Role check without authenticated user on {}", req.path());
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            "Authentication required",
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permits_any_listed_role() {
        let staff = RequireRole::new_any(UserRole::teacher_roles());
        assert!(RequireRole::permits(&staff.allowed, &UserRole::Teacher));
        assert!(RequireRole::permits(&staff.allowed, &UserRole::Admin));
        assert!(!RequireRole::permits(&staff.allowed, &UserRole::Family));

        let admin = RequireRole::new(&UserRole::Admin);
        assert!(!RequireRole::permits(&admin.allowed, &UserRole::Teacher));
    }
}
