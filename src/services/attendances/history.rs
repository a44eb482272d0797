use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AttendanceService;
use crate::models::attendances::responses::StudentAttendanceHistoryResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::courses::access::{current_user, ensure_student_access};

pub async fn get_student_history(
    service: &AttendanceService,
    request: &HttpRequest,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    if let Err(resp) = ensure_student_access(storage.as_ref(), &user, student_id).await {
        return Ok(resp);
    }

    match storage.list_student_attendance(student_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            StudentAttendanceHistoryResponse { student_id, items },
            "Attendance history retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to get attendance history: {e}"),
            )),
        ),
    }
}
