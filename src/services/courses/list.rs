use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use super::access::current_user;
use crate::models::courses::requests::{CourseListQuery, CourseQueryParams};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};

pub async fn list_courses(
    service: &CourseService,
    request: &HttpRequest,
    query: CourseQueryParams,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    // 教师只看到自己任教的课程
    let teacher_id = match user.role {
        UserRole::Teacher => Some(user.id),
        _ => query.teacher_id,
    };

    let list_query = CourseListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        teacher_id,
        academic_year: query.academic_year,
    };

    let storage = service.get_storage(request);
    match storage.list_courses_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Course list retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to get course list: {e}"),
            )),
        ),
    }
}
