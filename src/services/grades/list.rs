use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GradeService;
use crate::models::grades::responses::GradeListResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::courses::access::{current_user, ensure_session_access};
use crate::services::stats::teacher::forbid_other_teacher;

pub async fn list_session_grades(
    service: &GradeService,
    request: &HttpRequest,
    session_id: i64,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    if let Err(resp) = ensure_session_access(storage.as_ref(), &user, session_id).await {
        return Ok(resp);
    }

    match storage.list_session_grades(session_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            GradeListResponse { items },
            "Grades retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to list grades: {e}"),
            )),
        ),
    }
}

pub async fn list_teacher_grades(
    service: &GradeService,
    request: &HttpRequest,
    teacher_id: i64,
) -> ActixResult<HttpResponse> {
    if let Some(resp) = forbid_other_teacher(request, teacher_id) {
        return Ok(resp);
    }
    let storage = service.get_storage(request);

    match storage.list_teacher_grades(teacher_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            GradeListResponse { items },
            "Grades retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to list grades: {e}"),
            )),
        ),
    }
}
