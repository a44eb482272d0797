use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::family::FamilyQuery;
use crate::models::users::entities::UserRole;
use crate::services::FamilyService;

// 懒加载的全局 FamilyService 实例
static FAMILY_SERVICE: Lazy<FamilyService> = Lazy::new(FamilyService::new_lazy);

pub async fn get_dashboard(
    req: HttpRequest,
    query: web::Query<FamilyQuery>,
) -> ActixResult<HttpResponse> {
    FAMILY_SERVICE.get_dashboard(&req, query.into_inner()).await
}

// 配置路由
pub fn configure_family_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/family")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::family_roles()))
                    .route("/dashboard", web::get().to(get_dashboard)),
            ),
    );
}
