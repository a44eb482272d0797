use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::grades::requests::{CreateGradeRequest, GradeQuery, UpdateGradeRequest};
use crate::models::users::entities::UserRole;
use crate::services::GradeService;
use crate::utils::{SafeIDI64, SafeSessionIdI64, SafeTeacherIdI64};

// 懒加载的全局 GradeService 实例
static GRADE_SERVICE: Lazy<GradeService> = Lazy::new(GradeService::new_lazy);

pub async fn create_grade(
    req: HttpRequest,
    session_id: SafeSessionIdI64,
    grade_data: web::Json<CreateGradeRequest>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE
        .create_grade(&req, session_id.0, grade_data.into_inner())
        .await
}

pub async fn list_session_grades(
    req: HttpRequest,
    session_id: SafeSessionIdI64,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.list_session_grades(&req, session_id.0).await
}

pub async fn list_teacher_grades(
    req: HttpRequest,
    teacher_id: SafeTeacherIdI64,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.list_teacher_grades(&req, teacher_id.0).await
}

pub async fn get_grade(
    req: HttpRequest,
    id: SafeIDI64,
    query: web::Query<GradeQuery>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.get_grade(&req, id.0, query.into_inner()).await
}

pub async fn update_grade(
    req: HttpRequest,
    id: SafeIDI64,
    update_data: web::Json<UpdateGradeRequest>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE
        .update_grade(&req, id.0, update_data.into_inner())
        .await
}

pub async fn delete_grade(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.delete_grade(&req, id.0).await
}

// 配置路由
pub fn configure_grade_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/grades")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles()))
                    .route("/sessions/{session_id}", web::get().to(list_session_grades))
                    .route("/sessions/{session_id}", web::post().to(create_grade))
                    .route("/teachers/{teacher_id}", web::get().to(list_teacher_grades))
                    .route("/{id}", web::get().to(get_grade))
                    .route("/{id}", web::put().to(update_grade))
                    .route("/{id}", web::delete().to(delete_grade)),
            ),
    );
}
