use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::stats::requests::HighRiskQuery;
use crate::models::users::entities::UserRole;
use crate::services::StatsService;
use crate::utils::{SafeStudentIdI64, SafeTeacherIdI64};

// 懒加载的全局 StatsService 实例
static STATS_SERVICE: Lazy<StatsService> = Lazy::new(StatsService::new_lazy);

pub async fn get_student_stats(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    STATS_SERVICE.get_student_stats(&req, student_id.0).await
}

pub async fn get_teacher_stats(
    req: HttpRequest,
    teacher_id: SafeTeacherIdI64,
) -> ActixResult<HttpResponse> {
    STATS_SERVICE.get_teacher_stats(&req, teacher_id.0).await
}

pub async fn get_global_stats(req: HttpRequest) -> ActixResult<HttpResponse> {
    STATS_SERVICE.get_global_stats(&req).await
}

pub async fn list_high_risk_students(
    req: HttpRequest,
    query: web::Query<HighRiskQuery>,
) -> ActixResult<HttpResponse> {
    STATS_SERVICE
        .list_high_risk_students(&req, query.into_inner())
        .await
}

pub async fn check_duplicate_attendances(req: HttpRequest) -> ActixResult<HttpResponse> {
    STATS_SERVICE.check_duplicate_attendances(&req).await
}

pub async fn check_missing_attendances(
    req: HttpRequest,
    teacher_id: SafeTeacherIdI64,
) -> ActixResult<HttpResponse> {
    STATS_SERVICE
        .check_missing_attendances(&req, teacher_id.0)
        .await
}

pub async fn refresh_stats(req: HttpRequest) -> ActixResult<HttpResponse> {
    STATS_SERVICE.refresh_stats(&req).await
}

// 配置路由
pub fn configure_stats_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/stats")
            .wrap(middlewares::RequireJWT)
            .route(
                "/global",
                web::get()
                    .to(get_global_stats)
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
            )
            .route(
                "/refresh",
                web::post()
                    .to(refresh_stats)
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
            )
            .route(
                "/duplicate-attendances",
                web::get()
                    .to(check_duplicate_attendances)
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
            )
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles()))
                    .route("/students/{student_id}", web::get().to(get_student_stats))
                    .route("/teachers/{teacher_id}", web::get().to(get_teacher_stats))
                    .route(
                        "/teachers/{teacher_id}/missing-attendances",
                        web::get().to(check_missing_attendances),
                    )
                    .route("/high-risk", web::get().to(list_high_risk_students)),
            ),
    );
}
