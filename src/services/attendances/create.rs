use std::collections::HashSet;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AttendanceService;
use crate::models::attendances::requests::{AttendanceRecordInput, CreateAttendanceRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::courses::access::{current_user, ensure_session_access};
use crate::services::stats::refresh::{SheetKind, refresh_after_write};

/// 同一张表里重复出现的第一个学生
pub(crate) fn first_duplicate_student(ids: impl IntoIterator<Item = i64>) -> Option<i64> {
    let mut seen = HashSet::new();
    ids.into_iter().find(|id| !seen.insert(*id))
}

pub(super) fn validate_records(records: &[AttendanceRecordInput]) -> Result<(), String> {
    if let Some(id) = first_duplicate_student(records.iter().map(|r| r.student_id)) {
        return Err(format!("Student {id} appears more than once"));
    }
    Ok(())
}

pub async fn create_attendance(
    service: &AttendanceService,
    request: &HttpRequest,
    session_id: i64,
    req: CreateAttendanceRequest,
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
            ErrorCode::AttendanceInvalid,
            msg,
        )));
    }


    let student_ids = req.records.iter().map(|r| r.student_id).collect();
    match storage
        .create_attendance(session_id, user.id, req.date, req.records)
        .await
    {
        Ok(detail) => {
            info!(
                "Attendance {} created for session {} on {}",
                detail.attendance.id, session_id, detail.attendance.date
            );
            refresh_after_write(storage.as_ref(), session_id, SheetKind::Attendance, student_ids)
                .await;
            Ok(HttpResponse::Created().json(ApiResponse::success(detail, "Attendance created")))
        }
        Err(e) if e.is_conflict() => Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::AttendanceAlreadyExists,
            "An attendance sheet already exists for this session and day",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to create attendance: {e}"),
            )),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(student_id: i64, is_present: bool) -> AttendanceRecordInput {
        AttendanceRecordInput {
            student_id,
            is_present,
            comment: None,
        }
    }

    #[test]
    fn test_first_duplicate_student() {
        assert_eq!(first_duplicate_student([1, 2, 3]), None);
        assert_eq!(first_duplicate_student([4, 2, 4, 2]), Some(4));
    }

    #[test]
    fn test_empty_sheet_is_valid() {
        assert!(validate_records(&[]).is_ok());
    }

    #[test]
    fn test_duplicate_record_rejected() {
        let err = validate_records(&[record(7, true), record(7, false)]).unwrap_err();
        assert!(err.contains('7'));
    }
}
