use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::GradeService;
use super::create::validate_records;
use super::get::load_accessible;
use crate::models::grades::requests::UpdateGradeRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::courses::access::current_user;
use crate::services::stats::refresh::{SheetKind, affected_students, refresh_after_write};

pub async fn update_grade(
    service: &GradeService,
    request: &HttpRequest,
    grade_id: i64,
    req: UpdateGradeRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let before = match load_accessible(storage.as_ref(), &user, grade_id).await {
        Ok(detail) => detail,
        Err(resp) => return Ok(resp),
    };
    if !before.grade.is_active {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::GradeNotFound,
            "Grade not found",
        )));
    }

    if let Some(records) = &req.records
        && let Err(msg) = validate_records(records)
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::GradeInvalid,
            msg,
        )));
    }

    // 草稿状态或日期变化也会影响学生平均分，因此旧名单总是参与重算
    let affected = affected_students(
        before.records.iter().map(|r| r.student_id),
        req.records.iter().flatten().map(|r| r.student_id),
    );

    match storage.update_grade(grade_id, req).await {
        Ok(Some(detail)) => {
            info!("Grade sheet {} updated by user {}", grade_id, user.id);
            refresh_after_write(
                storage.as_ref(),
                detail.grade.session_id,
                SheetKind::Grade,
                affected,
            )
            .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(detail, "Grade updated")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::GradeNotFound,
            "Grade not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to update grade: {e}"),
            )),
        ),
    }
}
