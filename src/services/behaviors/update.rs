use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::BehaviorService;
use super::create::validate_records;
use super::get::load_accessible;
use crate::models::behaviors::requests::UpdateBehaviorRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::courses::access::current_user;
use crate::services::stats::refresh::{SheetKind, affected_students, refresh_after_write};

pub async fn update_behavior(
    service: &BehaviorService,
    request: &HttpRequest,
    behavior_id: i64,
    req: UpdateBehaviorRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let before = match load_accessible(storage.as_ref(), &user, behavior_id).await {
        Ok(detail) => detail,
        Err(resp) => return Ok(resp),
    };
    if !before.behavior.is_active {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::BehaviorNotFound,
            "Behavior is deleted, restore it before editing",
        )));
    }

    if let Err(msg) = validate_records(&req.records) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BehaviorInvalid,
            msg,
        )));
    }

    let affected = affected_students(
        before.records.iter().map(|r| r.student_id),
        req.records.iter().map(|r| r.student_id),
    );

    match storage.update_behavior(behavior_id, req.records).await {
        Ok(Some(detail)) => {
            info!("Behavior {} updated by user {}", behavior_id, user.id);
            refresh_after_write(
                storage.as_ref(),
                detail.behavior.session_id,
                SheetKind::Behavior,
                affected,
            )
            .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(detail, "Behavior updated")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::BehaviorNotFound,
            "Behavior not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to update behavior: {e}"),
            )),
        ),
    }
}
