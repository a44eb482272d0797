use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use super::SystemService;
use crate::models::system::HealthResponse;
use crate::models::{ApiResponse, AppStartTime};

pub async fn health(service: &SystemService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let config = service.get_config();
    let now = chrono::Utc::now();
    let started_at = request
        .app_data::<web::Data<AppStartTime>>()
        .map(|t| t.start_datetime)
        .unwrap_or(now);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        HealthResponse {
            status: "ok".to_string(),
            system_name: config.app.system_name.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at,
            uptime_seconds: now.signed_duration_since(started_at).num_seconds(),
        },
        "Service is healthy",
    )))
}
