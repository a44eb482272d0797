use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::behaviors::requests::{
    BehaviorQuery, CreateBehaviorRequest, UpdateBehaviorRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::BehaviorService;
use crate::utils::{SafeIDI64, SafeSessionIdI64, SafeStudentIdI64};

// 懒加载的全局 BehaviorService 实例
static BEHAVIOR_SERVICE: Lazy<BehaviorService> = Lazy::new(BehaviorService::new_lazy);

pub async fn create_behavior(
    req: HttpRequest,
    session_id: SafeSessionIdI64,
    behavior_data: web::Json<CreateBehaviorRequest>,
) -> ActixResult<HttpResponse> {
    BEHAVIOR_SERVICE
        .create_behavior(&req, session_id.0, behavior_data.into_inner())
        .await
}

pub async fn list_behaviors(
    req: HttpRequest,
    session_id: SafeSessionIdI64,
    query: web::Query<BehaviorQuery>,
) -> ActixResult<HttpResponse> {
    BEHAVIOR_SERVICE
        .list_behaviors(&req, session_id.0, query.into_inner())
        .await
}

pub async fn get_behavior(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    BEHAVIOR_SERVICE.get_behavior(&req, id.0).await
}

pub async fn update_behavior(
    req: HttpRequest,
    id: SafeIDI64,
    update_data: web::Json<UpdateBehaviorRequest>,
) -> ActixResult<HttpResponse> {
    BEHAVIOR_SERVICE
        .update_behavior(&req, id.0, update_data.into_inner())
        .await
}

pub async fn delete_behavior(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    BEHAVIOR_SERVICE.delete_behavior(&req, id.0).await
}

pub async fn restore_behavior(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    BEHAVIOR_SERVICE.restore_behavior(&req, id.0).await
}

pub async fn get_student_history(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    BEHAVIOR_SERVICE.get_student_history(&req, student_id.0).await
}

// 配置路由
pub fn configure_behavior_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/behaviors")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles()))
                    .route("/sessions/{session_id}", web::get().to(list_behaviors))
                    .route("/sessions/{session_id}", web::post().to(create_behavior))
                    .route("/students/{student_id}", web::get().to(get_student_history))
                    .route("/{id}", web::get().to(get_behavior))
                    .route("/{id}", web::put().to(update_behavior))
                    .route("/{id}", web::delete().to(delete_behavior))
                    .route("/{id}/restore", web::post().to(restore_behavior)),
            ),
    );
}
