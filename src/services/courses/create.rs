use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::CourseService;
use super::access::current_user;
use crate::config::AppConfig;
use crate::models::courses::entities::{TeacherTimeslot, is_valid_level};
use crate::models::courses::requests::{CreateCourseRequest, SessionInput, TimeslotInput};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;
use crate::utils::calendar::parse_academic_year;
use crate::utils::timeslot::{find_conflict, validate_range};

/// 学年标签省略时取当前学年
pub(crate) fn resolve_academic_year(label: Option<String>) -> Result<String, HttpResponse> {
    match label {
        None => Ok(AppConfig::get().current_academic_year()),
        Some(label) if parse_academic_year(&label).is_some() => Ok(label.trim().to_string()),
        Some(label) => Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            format!("Invalid academic year '{label}', expected YYYY-YYYY"),
        ))),
    }
}

/// 年级与时间段格式校验
pub(super) fn validate_timeslots(timeslots: &[TimeslotInput]) -> Result<(), String> {
    for slot in timeslots {
        validate_range(&slot.start_time, &slot.end_time)?;
    }
    Ok(())
}

pub(super) fn validate_sessions(sessions: &[SessionInput]) -> Result<(), (ErrorCode, String)> {
    if sessions.is_empty() {
        return Err((
            ErrorCode::BadRequest,
            "A course needs at least one session".to_string(),
        ));
    }
    for session in sessions {
        if !is_valid_level(&session.level) {
            return Err((
                ErrorCode::BadRequest,
                format!("Invalid level: {}", session.level),
            ));
        }
        validate_timeslots(&session.timeslots).map_err(|msg| (ErrorCode::TimeslotInvalid, msg))?;
    }
    Ok(())
}

/// 所有 ID 必须是已启用的教师
pub(super) async fn validate_teachers(
    storage: &dyn Storage,
    teacher_ids: &[i64],
) -> Result<(), HttpResponse> {
    if teacher_ids.is_empty() {
        return Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "A course needs at least one teacher",
        )));
    }

    let teachers = storage.get_users_by_ids(teacher_ids).await.map_err(|e| {
        HttpResponse::InternalServerError().json(ApiResponse::error_empty(
            ErrorCode::InternalServerError,
            format!("Failed to load teachers: {e}"),
        ))
    })?;

    for id in teacher_ids {
        let valid = teachers
            .iter()
            .any(|t| t.id == *id && t.role == UserRole::Teacher && t.is_available());
        if !valid {
            return Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                format!("User {id} is not an active teacher"),
            )));
        }
    }
    Ok(())
}

/// 新时间段与这些教师已有的时间段做冲突检测
///
/// `exclude_course_id` 的时间段不参与比较，`extra` 用于补回同一课程中不被替换的部分
pub(super) async fn check_overlap(
    storage: &dyn Storage,
    teacher_ids: &[i64],
    candidates: &[TimeslotInput],
    exclude_course_id: Option<i64>,
    extra: Vec<TeacherTimeslot>,
) -> Result<(), HttpResponse> {
    let mut existing = storage
        .list_teacher_timeslots(teacher_ids, exclude_course_id)
        .await
        .map_err(|e| {
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to load teacher timeslots: {e}"),
            ))
        })?;
    existing.extend(extra);

    find_conflict(candidates, &existing).map_err(|msg| {
        warn!("Timeslot conflict: {}", msg);
        HttpResponse::Conflict().json(ApiResponse::error_empty(ErrorCode::TimeslotOverlap, msg))
    })
}

pub async fn create_course(
    service: &CourseService,
    request: &HttpRequest,
    req: CreateCourseRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    // 教师创建课程时自己必须在任课名单中
    if user.role == UserRole::Teacher && !req.teacher_ids.contains(&user.id) {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::CoursePermissionDenied,
            "Teachers can only create courses they teach",
        )));
    }

    if let Err((code, msg)) = validate_sessions(&req.sessions) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(code, msg)));
    }
    let academic_year = match resolve_academic_year(req.academic_year) {
        Ok(year) => year,
        Err(resp) => return Ok(resp),
    };

    let storage = service.get_storage(request);
    if let Err(resp) = validate_teachers(storage.as_ref(), &req.teacher_ids).await {
        return Ok(resp);
    }

    let candidates: Vec<TimeslotInput> = req
        .sessions
        .iter()
        .flat_map(|s| s.timeslots.iter().cloned())
        .collect();
    if let Err(resp) =
        check_overlap(storage.as_ref(), &req.teacher_ids, &candidates, None, vec![]).await
    {
        return Ok(resp);
    }

    match storage
        .create_course(academic_year, req.teacher_ids, req.sessions)
        .await
    {
        Ok(course) => {
            info!(
                "Course {} created by user {} with {} sessions",
                course.course.id,
                user.id,
                course.sessions.len()
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(course, "Course created")))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::CourseCreationFailed,
                format!("Course creation failed: {e}"),
            )),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::courses::entities::{Subject, TimeSlotDay};

    fn session(level: &str, start: &str, end: &str) -> SessionInput {
        SessionInput {
            subject: Subject::Arabe,
            level: level.to_string(),
            timeslots: vec![TimeslotInput {
                day: TimeSlotDay::SaturdayMorning,
                start_time: start.to_string(),
                end_time: end.to_string(),
                classroom: Some("Salle 2".to_string()),
            }],
        }
    }

    #[test]
    fn test_validate_sessions_ok() {
        assert!(validate_sessions(&[session("3-4", "09:00", "10:30")]).is_ok());
    }

    #[test]
    fn test_validate_sessions_rejects_empty_and_bad_level() {
        assert_eq!(validate_sessions(&[]).unwrap_err().0, ErrorCode::BadRequest);
        let err = validate_sessions(&[session("9", "09:00", "10:30")]).unwrap_err();
        assert_eq!(err.0, ErrorCode::BadRequest);
        assert!(err.1.contains('9'));
    }

    #[test]
    fn test_validate_sessions_rejects_inverted_range() {
        let err = validate_sessions(&[session("1", "10:30", "09:00")]).unwrap_err();
        assert_eq!(err.0, ErrorCode::TimeslotInvalid);
    }
}
