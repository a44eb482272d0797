use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AttendanceService;
use crate::models::attendances::requests::AttendanceQuery;
use crate::models::attendances::responses::AttendanceListResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::courses::access::{current_user, ensure_session_access};

pub async fn list_attendances(
    service: &AttendanceService,
    request: &HttpRequest,
    session_id: i64,
    query: AttendanceQuery,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    if let Err(resp) = ensure_session_access(storage.as_ref(), &user, session_id).await {
        return Ok(resp);
    }

    let date = query
        .date
        .or_else(|| query.today.then(|| chrono::Utc::now().date_naive()));

    match storage
        .list_session_attendances(session_id, date, query.include_inactive)
        .await
    {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AttendanceListResponse { items },
            "Attendances retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to list attendances: {e}"),
            )),
        ),
    }
}
