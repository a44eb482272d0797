use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::CourseService;
use super::access::{current_user, ensure_session_access};
use super::create::{check_overlap, validate_timeslots};
use crate::models::courses::entities::{TeacherTimeslot, is_valid_level};
use crate::models::courses::requests::UpdateSessionRequest;
use crate::models::courses::responses::SessionListResponse;
use crate::models::{ApiResponse, ErrorCode};

pub async fn get_session(
    service: &CourseService,
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

    match storage.get_session_detail(session_id).await {
        Ok(Some(detail)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            detail,
            "Session retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SessionNotFound,
            "Session not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to get session: {e}"),
            )),
        ),
    }
}

pub async fn update_session(
    service: &CourseService,
    request: &HttpRequest,
    session_id: i64,
    req: UpdateSessionRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let session = match ensure_session_access(storage.as_ref(), &user, session_id).await {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };

    if let Some(level) = &req.level
        && !is_valid_level(level)
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            format!("Invalid level: {level}"),
        )));
    }

    if let Some(timeslots) = &req.timeslots {
        if let Err(msg) = validate_timeslots(timeslots) {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::TimeslotInvalid, msg)));
        }

        let course = match storage.get_course_detail(session.course_id).await {
            Ok(Some(course)) => course,
            Ok(None) => {
                return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::CourseNotFound,
                    "Course not found",
                )));
            }
            Err(e) => {
                return Ok(
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::InternalServerError,
                        format!("Failed to get course: {e}"),
                    )),
                );
            }
        };

        // 排除本课程后，把同课程其他课时的时间段补回来参与比较
        let teacher_ids: Vec<i64> = course.teachers.iter().map(|t| t.id).collect();
        let mut siblings = Vec::new();
        for other in course.sessions.iter().filter(|s| s.id != session_id) {
            for slot in &other.timeslots {
                for teacher_id in &teacher_ids {
                    siblings.push(TeacherTimeslot {
                        teacher_id: *teacher_id,
                        course_id: other.course_id,
                        session_id: other.id,
                        day: slot.day,
                        start_time: slot.start_time.clone(),
                        end_time: slot.end_time.clone(),
                    });
                }
            }
        }

        if let Err(resp) = check_overlap(
            storage.as_ref(),
            &teacher_ids,
            timeslots,
            Some(session.course_id),
            siblings,
        )
        .await
        {
            return Ok(resp);
        }
    }

    match storage.update_session(session_id, req).await {
        Ok(Some(session)) => {
            info!("Session {} updated by user {}", session_id, user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(session, "Session updated")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SessionNotFound,
            "Session not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to update session: {e}"),
            )),
        ),
    }
}

pub async fn list_student_sessions(
    service: &CourseService,
    request: &HttpRequest,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_student_sessions(student_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SessionListResponse { items },
            "Sessions retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to get sessions: {e}"),
            )),
        ),
    }
}

// 当前教师任教的课时
pub async fn list_my_sessions(
    service: &CourseService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    match storage.list_teacher_sessions(user.id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SessionListResponse { items },
            "Sessions retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to get sessions: {e}"),
            )),
        ),
    }
}
