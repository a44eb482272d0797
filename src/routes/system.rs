use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, middleware, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::system::ConnectionLogParams;
use crate::models::users::entities::UserRole;
use crate::services::SystemService;

// 懒加载的全局 SystemService 实例
static SYSTEM_SERVICE: Lazy<SystemService> = Lazy::new(SystemService::new_lazy);

pub async fn health(request: HttpRequest) -> ActixResult<HttpResponse> {
    SYSTEM_SERVICE.health(&request).await
}

pub async fn list_connection_logs(
    request: HttpRequest,
    query: web::Query<ConnectionLogParams>,
) -> ActixResult<HttpResponse> {
    SYSTEM_SERVICE
        .list_connection_logs(&request, query.into_inner())
        .await
}

// 配置路由
pub fn configure_system_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/system")
            .wrap(middleware::Compress::default())
            .route("/health", web::get().to(health))
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .wrap(middlewares::RequireJWT)
                    .route("/connection-logs", web::get().to(list_connection_logs)),
            ),
    );
}
