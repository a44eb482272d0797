use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::GradeService;
use super::get::load_accessible;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::courses::access::current_user;
use crate::services::stats::refresh::{SheetKind, refresh_after_write};

pub async fn delete_grade(
    service: &GradeService,
    request: &HttpRequest,
    grade_id: i64,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let detail = match load_accessible(storage.as_ref(), &user, grade_id).await {
        Ok(detail) => detail,
        Err(resp) => return Ok(resp),
    };

    match storage.soft_delete_grade(grade_id).await {
        Ok(true) => {
            info!("Grade sheet {} deleted by user {}", grade_id, user.id);
            let students = detail.records.iter().map(|r| r.student_id).collect();
            refresh_after_write(storage.as_ref(), detail.grade.session_id, SheetKind::Grade, students)
                .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Grade deleted")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::GradeNotFound,
            "Grade not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to delete grade: {e}"),
            )),
        ),
    }
}
