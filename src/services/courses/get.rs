use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use super::access::{current_user, ensure_course_access};
use crate::models::{ApiResponse, ErrorCode};

pub async fn get_course(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    if let Err(resp) = ensure_course_access(storage.as_ref(), &user, course_id).await {
        return Ok(resp);
    }

    match storage.get_course_detail(course_id).await {
        Ok(Some(course)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            course,
            "Course retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CourseNotFound,
            "Course not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to get course: {e}"),
            )),
        ),
    }
}
