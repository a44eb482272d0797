use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GradeService;
use crate::models::grades::entities::GradeDetail;
use crate::models::grades::requests::GradeQuery;
use crate::models::grades::responses::GradeStatsResponse;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::courses::access::{current_user, ensure_session_access};
use crate::storage::Storage;

pub(super) async fn load_accessible(
    storage: &dyn Storage,
    user: &User,
    grade_id: i64,
) -> Result<GradeDetail, HttpResponse> {
    let detail = match storage.get_grade(grade_id).await {
        Ok(Some(detail)) => detail,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::GradeNotFound,
                "Grade not found",
            )));
        }
        Err(e) => {
            return Err(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to get grade: {e}"),
                )),
            );
        }
    };
    ensure_session_access(storage, user, detail.grade.session_id).await?;
    Ok(detail)
}

pub async fn get_grade(
    service: &GradeService,
    request: &HttpRequest,
    grade_id: i64,
    query: GradeQuery,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    let detail = match load_accessible(storage.as_ref(), &user, grade_id).await {
        Ok(detail) => detail,
        Err(resp) => return Ok(resp),
    };

    if query.stats_only {
        return Ok(HttpResponse::Ok().json(ApiResponse::success(
            GradeStatsResponse {
                grade_id,
                stats: detail.grade.stats,
            },
            "Grade stats retrieved successfully",
        )));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(detail, "Grade retrieved successfully")))
}
