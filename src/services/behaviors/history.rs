use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::BehaviorService;
use crate::models::behaviors::responses::StudentBehaviorHistoryResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::courses::access::{current_user, ensure_student_access};

pub async fn get_student_history(
    service: &BehaviorService,
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

    match storage.list_student_behavior(student_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            StudentBehaviorHistoryResponse { student_id, items },
            "Behavior history retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to get behavior history: {e}"),
            )),
        ),
    }
}
