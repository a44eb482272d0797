use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{entities::UserRole, responses::RelatedUsersResponse},
};

pub async fn list_teacher_students(
    service: &UserService,
    teacher_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    // 教师只能查看自己的学生
    if RequireJWT::extract_user_role(request) == Some(UserRole::Teacher)
        && RequireJWT::extract_user_id(request) != Some(teacher_id)
    {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Teachers can only list their own students",
        )));
    }

    let storage = service.get_storage(request);

    match storage.list_teacher_students(teacher_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            RelatedUsersResponse {
                user_id: teacher_id,
                items,
            },
            "Students retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to get students: {e}"),
            )),
        ),
    }
}

pub async fn list_student_teachers(
    service: &UserService,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_student_teachers(student_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            RelatedUsersResponse {
                user_id: student_id,
                items,
            },
            "Teachers retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to get teachers: {e}"),
            )),
        ),
    }
}
