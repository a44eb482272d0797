use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AttendanceService;
use super::get::load_accessible;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::courses::access::current_user;
use crate::services::stats::refresh::{SheetKind, refresh_after_write};

/// 软删除（active = false）或恢复（active = true）
pub async fn set_active(
    service: &AttendanceService,
    request: &HttpRequest,
    attendance_id: i64,
    active: bool,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let detail = match load_accessible(storage.as_ref(), &user, attendance_id).await {
        Ok(detail) => detail,
        Err(resp) => return Ok(resp),
    };
    let sheet = &detail.attendance;

    if sheet.is_active == active {
        let msg = if active {
            "Attendance is already active"
        } else {
            "Attendance is already deleted"
        };
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            msg,
        )));
    }

    match storage.set_attendance_active(attendance_id, active).await {
        Ok(true) => {
            info!(
                "Attendance {} {} by user {}",
                attendance_id,
                if active { "restored" } else { "deleted" },
                user.id
            );
            let students = detail.records.iter().map(|r| r.student_id).collect();
            refresh_after_write(storage.as_ref(), sheet.session_id, SheetKind::Attendance, students)
                .await;
            let msg = if active {
                "Attendance restored"
            } else {
                "Attendance deleted"
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty(msg)))
        }
        // 恢复时同一天已有另一张有效表
        Err(e) if e.is_conflict() => Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::AttendanceAlreadyExists,
            "Another active attendance sheet exists for this day",
        ))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
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
