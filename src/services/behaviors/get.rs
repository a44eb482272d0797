use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::BehaviorService;
use crate::models::behaviors::entities::BehaviorDetail;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::courses::access::{current_user, ensure_session_access};
use crate::storage::Storage;

/// 加载考勤表并校验当前用户对其课时的权限
pub(super) async fn load_accessible(
    storage: &dyn Storage,
    user: &User,
    behavior_id: i64,
) -> Result<BehaviorDetail, HttpResponse> {
    let detail = match storage.get_behavior(behavior_id).await {
        Ok(Some(detail)) => detail,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::BehaviorNotFound,
                "Behavior not found",
            )));
        }
        Err(e) => {
            return Err(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to get behavior: {e}"),
                )),
            );
        }
    };
    ensure_session_access(storage, user, detail.behavior.session_id).await?;
    Ok(detail)
}

pub async fn get_behavior(
    service: &BehaviorService,
    request: &HttpRequest,
    behavior_id: i64,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    match load_accessible(storage.as_ref(), &user, behavior_id).await {
        Ok(detail) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            detail,
            "Behavior retrieved successfully",
        ))),
        Err(resp) => Ok(resp),
    }
}
