use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::courses::requests::{
    CourseQueryParams, CreateCourseRequest, EnrollStudentRequest, UpdateCourseRequest,
    UpdateSessionRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::CourseService;
use crate::utils::{SafeCourseIdI64, SafeSessionIdI64, SafeStudentIdI64};

// 懒加载的全局 CourseService 实例
static COURSE_SERVICE: Lazy<CourseService> = Lazy::new(CourseService::new_lazy);

pub async fn list_courses(
    req: HttpRequest,
    query: web::Query<CourseQueryParams>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.list_courses(&req, query.into_inner()).await
}

pub async fn create_course(
    req: HttpRequest,
    course_data: web::Json<CreateCourseRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.create_course(&req, course_data.into_inner()).await
}

pub async fn get_course(req: HttpRequest, course_id: SafeCourseIdI64) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.get_course(&req, course_id.0).await
}

pub async fn update_course(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
    update_data: web::Json<UpdateCourseRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .update_course(&req, course_id.0, update_data.into_inner())
        .await
}

pub async fn delete_course(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.delete_course(&req, course_id.0).await
}

pub async fn get_session(
    req: HttpRequest,
    session_id: SafeSessionIdI64,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.get_session(&req, session_id.0).await
}

pub async fn update_session(
    req: HttpRequest,
    session_id: SafeSessionIdI64,
    update_data: web::Json<UpdateSessionRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .update_session(&req, session_id.0, update_data.into_inner())
        .await
}

pub async fn list_my_sessions(req: HttpRequest) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.list_my_sessions(&req).await
}

pub async fn list_student_sessions(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.list_student_sessions(&req, student_id.0).await
}

pub async fn enroll_student(
    req: HttpRequest,
    session_id: SafeSessionIdI64,
    enroll_data: web::Json<EnrollStudentRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .enroll_student(&req, session_id.0, enroll_data.into_inner())
        .await
}

pub async fn remove_student(
    req: HttpRequest,
    session_id: SafeSessionIdI64,
    student_id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .remove_student(&req, session_id.0, student_id.0)
        .await
}

// 配置路由
pub fn configure_course_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/courses")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles()))
                    .route("", web::get().to(list_courses))
                    .route("", web::post().to(create_course))
                    .route("/{course_id}", web::get().to(get_course))
                    .route("/{course_id}", web::put().to(update_course))
                    .route("/{course_id}", web::delete().to(delete_course)),
            ),
    );
    cfg.service(
        web::scope("/api/v1/sessions")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles()))
                    .route("/mine", web::get().to(list_my_sessions))
                    .route(
                        "/students/{student_id}",
                        web::get().to(list_student_sessions),
                    )
                    .route("/{session_id}", web::get().to(get_session))
                    .route("/{session_id}", web::put().to(update_session))
                    .route("/{session_id}/students", web::post().to(enroll_student))
                    .route(
                        "/{session_id}/students/{student_id}",
                        web::delete().to(remove_student),
                    ),
            ),
    );
}
