use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::CourseService;
use super::access::{current_user, ensure_session_access};
use crate::models::courses::requests::EnrollStudentRequest;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};

pub async fn enroll_student(
    service: &CourseService,
    request: &HttpRequest,
    session_id: i64,
    req: EnrollStudentRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    if let Err(resp) = ensure_session_access(storage.as_ref(), &user, session_id).await {
        return Ok(resp);
    }

    match storage.get_user_by_id(req.student_id).await {
        Ok(Some(student)) if student.role == UserRole::Student && student.is_available() => {}
        Ok(Some(_)) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                "Only active students can be enrolled",
            )));
        }
        Ok(None) => {
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

    let already_enrolled = || {
        HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::StudentAlreadyEnrolled,
            "Student is already enrolled in this session",
        ))
    };

    match storage.get_session_detail(session_id).await {
        Ok(Some(detail)) if detail.students.iter().any(|s| s.id == req.student_id) => {
            return Ok(already_enrolled());
        }
        Ok(_) => {}
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to get session: {e}"),
                )),
            );
        }
    }

    // 并发选课时由唯一索引兜底
    match storage.enroll_student(session_id, req.student_id).await {
        Ok(enrollment) => {
            info!("Student {} enrolled in session {}", req.student_id, session_id);
            Ok(HttpResponse::Created().json(ApiResponse::success(enrollment, "Student enrolled")))
        }
        Err(e) if e.is_conflict() => Ok(already_enrolled()),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to enroll student: {e}"),
            )),
        ),
    }
}

pub async fn remove_student(
    service: &CourseService,
    request: &HttpRequest,
    session_id: i64,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    if let Err(resp) = ensure_session_access(storage.as_ref(), &user, session_id).await {
        return Ok(resp);
    }

    match storage.remove_student(session_id, student_id).await {
        Ok(true) => {
            info!("Student {} removed from session {}", student_id, session_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Student removed")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::StudentNotEnrolled,
            "Student is not enrolled in this session",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to remove student: {e}"),
            )),
        ),
    }
}
