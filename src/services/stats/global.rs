use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StatsService;
use crate::models::stats::responses::GlobalStatsResponse;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};

pub async fn get_global_stats(
    service: &StatsService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let result = async {
        let total_students = storage.count_active_users_by_role(UserRole::Student).await?;
        let total_teachers = storage.count_active_users_by_role(UserRole::Teacher).await?;
        let average_presence_rate = storage.average_presence_rate().await?;
        Ok::<_, crate::errors::SchoolHubError>(GlobalStatsResponse {
            total_students: total_students as i64,
            total_teachers: total_teachers as i64,
            average_presence_rate,
        })
    }
    .await;

    match result {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Global stats retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to get global stats: {e}"),
            )),
        ),
    }
}
