use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AttendanceService;
use super::create::validate_records;
use super::get::load_accessible;
use crate::models::attendances::requests::UpdateAttendanceRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::courses::access::current_user;
use crate::services::stats::refresh::{SheetKind, affected_students, refresh_after_write};

pub async fn update_attendance(
    service: &AttendanceService,
    request: &HttpRequest,
    attendance_id: i64,
    req: UpdateAttendanceRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let before = match load_accessible(storage.as_ref(), &user, attendance_id).await {
        Ok(detail) => detail,
        Err(resp) => return Ok(resp),
    };
    if !before.attendance.is_active {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AttendanceNotFound,
            "Attendance is deleted, restore it before editing",
        )));
    }

    if let Err(msg) = validate_records(&req.records) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::AttendanceInvalid,
            msg,
        )));
    }

    let affected = affected_students(
        before.records.iter().map(|r| r.student_id),
        req.records.iter().map(|r| r.student_id),
    );

    match storage.update_attendance(attendance_id, req.records).await {
        Ok(Some(detail)) => {
            info!("Attendance {} updated by user {}", attendance_id, user.id);
            refresh_after_write(
                storage.as_ref(),
                detail.attendance.session_id,
                SheetKind::Attendance,
                affected,
            )
            .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(detail, "Attendance updated")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AttendanceNotFound,
            "Attendance not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to update attendance: {e}"),
            )),
        ),
    }
}
