use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::attendances::requests::{
    AttendanceQuery, CreateAttendanceRequest, UpdateAttendanceRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::AttendanceService;
use crate::utils::{SafeIDI64, SafeSessionIdI64, SafeStudentIdI64};

// 懒加载的全局 AttendanceService 实例
static ATTENDANCE_SERVICE: Lazy<AttendanceService> = Lazy::new(AttendanceService::new_lazy);

pub async fn create_attendance(
    req: HttpRequest,
    session_id: SafeSessionIdI64,
    attendance_data: web::Json<CreateAttendanceRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .create_attendance(&req, session_id.0, attendance_data.into_inner())
        .await
}

pub async fn list_attendances(
    req: HttpRequest,
    session_id: SafeSessionIdI64,
    query: web::Query<AttendanceQuery>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .list_attendances(&req, session_id.0, query.into_inner())
        .await
}

pub async fn get_attendance(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.get_attendance(&req, id.0).await
}

pub async fn update_attendance(
    req: HttpRequest,
    id: SafeIDI64,
    update_data: web::Json<UpdateAttendanceRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .update_attendance(&req, id.0, update_data.into_inner())
        .await
}

pub async fn delete_attendance(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.delete_attendance(&req, id.0).await
}

pub async fn restore_attendance(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.restore_attendance(&req, id.0).await
}

pub async fn get_student_history(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.get_student_history(&req, student_id.0).await
}

// 配置路由
pub fn configure_attendance_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/attendances")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles()))
                    .route("/sessions/{session_id}", web::get().to(list_attendances))
                    .route("/sessions/{session_id}", web::post().to(create_attendance))
                    .route("/students/{student_id}", web::get().to(get_student_history))
                    .route("/{id}", web::get().to(get_attendance))
                    .route("/{id}", web::put().to(update_attendance))
                    .route("/{id}", web::delete().to(delete_attendance))
                    .route("/{id}/restore", web::post().to(restore_attendance)),
            ),
    );
}
