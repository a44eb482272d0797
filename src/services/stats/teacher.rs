use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StatsService;
use crate::middlewares::RequireJWT;
use crate::models::stats::responses::TeacherStatsResponse;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::stats::{age_stats, gender_distribution};

pub(crate) fn forbid_other_teacher(request: &HttpRequest, teacher_id: i64) -> Option<HttpResponse> {
    let is_other_teacher = RequireJWT::extract_user_role(request) == Some(UserRole::Teacher)
        && RequireJWT::extract_user_id(request) != Some(teacher_id);
    is_other_teacher.then(|| {
        HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Teachers can only view their own stats",
        ))
    })
}

pub async fn get_teacher_stats(
    service: &StatsService,
    request: &HttpRequest,
    teacher_id: i64,
) -> ActixResult<HttpResponse> {
    if let Some(resp) = forbid_other_teacher(request, teacher_id) {
        return Ok(resp);
    }

    let storage = service.get_storage(request);
    let students = match storage.list_teacher_students(teacher_id).await {
        Ok(students) => students,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to get students: {e}"),
                )),
            );
        }
    };

    let today = chrono::Utc::now().date_naive();
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        TeacherStatsResponse {
            teacher_id,
            total_students: students.len() as i32,
            gender_distribution: gender_distribution(&students),
            age: age_stats(&students, today),
        },
        "Teacher stats retrieved successfully",
    )))
}
