use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::BehaviorService;
use super::get::load_accessible;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::courses::access::current_user;
use crate::services::stats::refresh::{SheetKind, refresh_after_write};

/// 软删除（active = false）或恢复（active = true）
pub async fn set_active(
    service: &BehaviorService,
    request: &HttpRequest,
    behavior_id: i64,
    active: bool,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let detail = match load_accessible(storage.as_ref(), &user, behavior_id).await {
        Ok(detail) => detail,
        Err(resp) => return Ok(resp),
    };
    let sheet = &detail.behavior;

    if sheet.is_active == active {
        let msg = if active {
            "Behavior is already active"
        } else {
            "Behavior is already deleted"
        };
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            msg,
        )));
    }

    match storage.set_behavior_active(behavior_id, active).await {
        Ok(true) => {
            info!(
                "Behavior {} {} by user {}",
                behavior_id,
                if active { "restored" } else { "deleted" },
                user.id
            );
            let students = detail.records.iter().map(|r| r.student_id).collect();
            refresh_after_write(storage.as_ref(), sheet.session_id, SheetKind::Behavior, students)
                .await;
            let msg = if active {
                "Behavior restored"
            } else {
                "Behavior deleted"
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty(msg)))
        }
        // 恢复时同一天已有另一张有效表
        Err(e) if e.is_conflict() => Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::BehaviorAlreadyExists,
            "Another active behavior sheet exists for this day",
        ))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
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
