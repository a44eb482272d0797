use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::CourseService;
use super::access::{current_user, ensure_course_access};
use super::create::{check_overlap, resolve_academic_year, validate_teachers};
use crate::models::courses::entities::Timeslot;
use crate::models::courses::requests::{TimeslotInput, UpdateCourseRequest};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};

fn as_input(slot: &Timeslot) -> TimeslotInput {
    TimeslotInput {
        day: slot.day,
        start_time: slot.start_time.clone(),
        end_time: slot.end_time.clone(),
        classroom: slot.classroom.clone(),
    }
}

pub async fn update_course(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
    mut req: UpdateCourseRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    if let Err(resp) = ensure_course_access(storage.as_ref(), &user, course_id).await {
        return Ok(resp);
    }

    let existing = match storage.get_course_detail(course_id).await {
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

    if req.academic_year.is_some() {
        match resolve_academic_year(req.academic_year.take()) {
            Ok(year) => req.academic_year = Some(year),
            Err(resp) => return Ok(resp),
        }
    }

    // 更换教师或重新启用课程时，需重新检查时间冲突
    let reactivating = req.is_active == Some(true) && !existing.course.is_active;
    if req.teacher_ids.is_some() || reactivating {
        let teacher_ids: Vec<i64> = match &req.teacher_ids {
            Some(ids) => ids.clone(),
            None => existing.teachers.iter().map(|t| t.id).collect(),
        };

        if user.role == UserRole::Teacher && !teacher_ids.contains(&user.id) {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::CoursePermissionDenied,
                "Teachers cannot remove themselves from a course",
            )));
        }
        if let Err(resp) = validate_teachers(storage.as_ref(), &teacher_ids).await {
            return Ok(resp);
        }

        let candidates: Vec<TimeslotInput> = existing
            .sessions
            .iter()
            .flat_map(|s| s.timeslots.iter().map(as_input))
            .collect();
        if let Err(resp) = check_overlap(
            storage.as_ref(),
            &teacher_ids,
            &candidates,
            Some(course_id),
            vec![],
        )
        .await
        {
            return Ok(resp);
        }
    }

    match storage.update_course(course_id, req).await {
        Ok(Some(course)) => {
            info!("Course {} updated by user {}", course_id, user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(course, "Course updated")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CourseNotFound,
            "Course not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to update course: {e}"),
            )),
        ),
    }
}
