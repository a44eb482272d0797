use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::GradeService;
use crate::models::grades::entities::MAX_GRADE_VALUE;
use crate::models::grades::requests::{CreateGradeRequest, GradeRecordInput};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::attendances::create::first_duplicate_student;
use crate::services::courses::access::{current_user, ensure_session_access};
use crate::services::stats::refresh::{SheetKind, refresh_after_write};

/// 分数在 0 到 20 之间；缺考记录的分数会被忽略
pub(super) fn validate_records(records: &[GradeRecordInput]) -> Result<(), String> {
    if let Some(id) = first_duplicate_student(records.iter().map(|r| r.student_id)) {
        return Err(format!("Student {id} appears more than once"));
    }
    for record in records.iter().filter(|r| !r.is_absent) {
        if let Some(value) = record.value
            && !(0.0..=MAX_GRADE_VALUE).contains(&value)
        {
            return Err(format!(
                "Grade of student {} must be between 0 and {MAX_GRADE_VALUE}",
                record.student_id
            ));
        }
    }
    Ok(())
}

pub async fn create_grade(
    service: &GradeService,
    request: &HttpRequest,
    session_id: i64,
    req: CreateGradeRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    if let Err(resp) = ensure_session_access(storage.as_ref(), &user, session_id).await {
        return Ok(resp);
    }

    if let Err(msg) = validate_records(&req.records) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::GradeInvalid,
            msg,
        )));
    }

    let student_ids = req.records.iter().map(|r| r.student_id).collect();
    match storage.create_grade(session_id, user.id, req).await {
        Ok(detail) => {
            info!(
                "Grade sheet {} created for session {} ({})",
                detail.grade.id, session_id, detail.grade.grade_type
            );
            refresh_after_write(storage.as_ref(), session_id, SheetKind::Grade, student_ids).await;
            Ok(HttpResponse::Created().json(ApiResponse::success(detail, "Grade created")))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to create grade: {e}"),
            )),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(student_id: i64, value: Option<f64>, is_absent: bool) -> GradeRecordInput {
        GradeRecordInput {
            student_id,
            value,
            is_absent,
            comment: None,
        }
    }

    #[test]
    fn test_valid_grades_accepted() {
        let records = [
            record(1, Some(0.0), false),
            record(2, Some(20.0), false),
            record(3, None, true),
            record(4, None, false),
        ];
        assert!(validate_records(&records).is_ok());
    }

    #[test]
    fn test_out_of_range_grade_rejected() {
        assert!(validate_records(&[record(1, Some(20.5), false)]).is_err());
        assert!(validate_records(&[record(1, Some(-1.0), false)]).is_err());
    }

    #[test]
    fn test_absent_value_ignored() {
        assert!(validate_records(&[record(1, Some(42.0), true)]).is_ok());
    }
}
