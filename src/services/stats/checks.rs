use std::collections::HashSet;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StatsService;
use super::teacher::forbid_other_teacher;
use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::stats::entities::MissingAttendance;
use crate::models::stats::responses::{DuplicateAttendanceResponse, MissingAttendanceResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::calendar::holidays::holidays_for_year;
use crate::utils::stats::{duplicate_groups, missing_attendance};

pub async fn check_duplicate_attendances(
    service: &StatsService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_active_attendance_headers().await {
        Ok(headers) => {
            let groups = duplicate_groups(&headers);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                DuplicateAttendanceResponse {
                    total: groups.len() as i32,
                    groups,
                },
                "Duplicate check completed",
            )))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to check duplicates: {e}"),
            )),
        ),
    }
}

pub async fn check_missing_attendances(
    service: &StatsService,
    request: &HttpRequest,
    teacher_id: i64,
) -> ActixResult<HttpResponse> {
    if let Some(resp) = forbid_other_teacher(request, teacher_id) {
        return Ok(resp);
    }

    let storage = service.get_storage(request);
    let cache = service.get_cache(request);
    let config = AppConfig::get();
    let from = config.school_start_date();
    let to = chrono::Utc::now().date_naive();

    let result: Result<Vec<MissingAttendance>> = async {
        let holidays =
            holidays_for_year(storage.as_ref(), cache.as_ref(), &config.current_academic_year())
                .await?
                .items;

        let mut items = Vec::new();
        for session in storage.list_teacher_sessions(teacher_id).await? {
            let recorded: HashSet<_> = storage
                .list_session_attendances(session.id, None, false)
                .await?
                .into_iter()
                .map(|sheet| sheet.date)
                .collect();
            items.extend(missing_attendance(&session, from, to, &holidays, &recorded));
        }
        Ok(items)
    }
    .await;

    match result {
        Ok(items) => {
            let total_missing = items.iter().map(|m| m.dates.len() as i32).sum();
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                MissingAttendanceResponse {
                    teacher_id,
                    from,
                    to,
                    total_missing,
                    items,
                },
                "Missing attendance check completed",
            )))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to check missing attendances: {e}"),
            )),
        ),
    }
}
