use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StatsService;
use super::refresh::student_overview;
use crate::models::stats::responses::StudentStatsResponse;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::courses::access::{current_user, ensure_student_access};

pub async fn get_student_stats(
    service: &StatsService,
    request: &HttpRequest,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    match storage.get_user_by_id(student_id).await {
        Ok(Some(student)) if student.role == UserRole::Student => {}
        Ok(_) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "Student not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to get student: {e}"),
                )),
            );
        }
    }

    if let Err(resp) = ensure_student_access(storage.as_ref(), &user, student_id).await {
        return Ok(resp);
    }

    let overview = match student_overview(storage.as_ref(), student_id).await {
        Ok(overview) => overview,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to compute student stats: {e}"),
                )),
            );
        }
    };
    let persisted = storage.get_student_stats(student_id).await.unwrap_or_else(|e| {
        tracing::warn!("Failed to load persisted stats of student {}: {}", student_id, e);
        None
    });

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        StudentStatsResponse {
            student_id,
            attendance: overview.attendance,
            behavior: overview.behavior,
            grades: overview.grades,
            persisted,
        },
        "Student stats retrieved successfully",
    )))
}
