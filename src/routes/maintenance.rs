use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::users::entities::UserRole;
use crate::services::MaintenanceService;

// 懒加载的全局 MaintenanceService 实例
static MAINTENANCE_SERVICE: Lazy<MaintenanceService> = Lazy::new(MaintenanceService::new_lazy);

pub async fn run_task(req: HttpRequest, task: web::Path<String>) -> ActixResult<HttpResponse> {
    MAINTENANCE_SERVICE.run_task(&req, &task).await
}

// 配置路由
pub fn configure_maintenance_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/maintenance")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .route("/{task}", web::post().to(run_task)),
            ),
    );
}
