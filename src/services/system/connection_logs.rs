use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SystemService;
use crate::models::system::ConnectionLogParams;
use crate::models::{ApiResponse, ErrorCode};

pub async fn list_connection_logs(
    service: &SystemService,
    request: &HttpRequest,
    params: ConnectionLogParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_connection_logs(params).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Connection logs retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to list connection logs: {e}"),
            )),
        ),
    }
}
