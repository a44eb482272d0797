use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Datelike;
use tracing::info;

use super::CalendarService;
use crate::cache::{CacheResult, ObjectCache, ObjectCacheExt, keys};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::middlewares::RequireJWT;
use crate::models::calendar::entities::HolidayPeriod;
use crate::models::calendar::requests::{HolidayListQuery, SaveHolidaysRequest};
use crate::models::calendar::responses::{CurrentHolidaysResponse, HolidayListResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::courses::create::resolve_academic_year;
use crate::storage::Storage;
use crate::utils::calendar::{default_holidays, parse_academic_year};

/// 某学年的有效假期，未保存过时使用内置默认值
pub(crate) async fn holidays_for_year(
    storage: &dyn Storage,
    cache: Option<&Arc<dyn ObjectCache>>,
    academic_year: &str,
) -> Result<CurrentHolidaysResponse> {
    let cache_key = keys::current_holidays(academic_year);
    if let Some(cache) = cache
        && let CacheResult::Found(response) =
            cache.get_json::<CurrentHolidaysResponse>(&cache_key).await
    {
        return Ok(response);
    }

    let stored = storage.list_active_holidays(academic_year).await?;
    let response = if stored.is_empty() {
        let start_year = parse_academic_year(academic_year)
            .unwrap_or_else(|| chrono::Utc::now().date_naive().year());
        CurrentHolidaysResponse {
            academic_year: academic_year.to_string(),
            is_default: true,
            items: default_holidays(start_year),
        }
    } else {
        CurrentHolidaysResponse {
            academic_year: academic_year.to_string(),
            is_default: false,
            items: stored.into_iter().map(|h| h.period).collect(),
        }
    };

    if let Some(cache) = cache {
        cache.insert_json(&cache_key, &response, 0).await;
    }
    Ok(response)
}

/// 名称非空且起止日期有序
pub(super) fn validate_holidays(holidays: &[HolidayPeriod]) -> std::result::Result<(), String> {
    for holiday in holidays {
        if holiday.name.trim().is_empty() {
            return Err("Holiday name must not be empty".to_string());
        }
        if holiday.start_date > holiday.end_date {
            return Err(format!(
                "Holiday '{}' starts after it ends ({} > {})",
                holiday.name, holiday.start_date, holiday.end_date
            ));
        }
    }
    Ok(())
}

pub async fn list_holidays(
    service: &CalendarService,
    request: &HttpRequest,
    query: HolidayListQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_holidays(query.academic_year).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            HolidayListResponse { items },
            "Holidays retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to get holidays: {e}"),
            )),
        ),
    }
}

pub async fn get_current_holidays(
    service: &CalendarService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let cache = service.get_cache(request);
    let academic_year = AppConfig::get().current_academic_year();

    match holidays_for_year(storage.as_ref(), cache.as_ref(), &academic_year).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Current holidays retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to get holidays: {e}"),
            )),
        ),
    }
}

pub async fn save_holidays(
    service: &CalendarService,
    request: &HttpRequest,
    req: SaveHolidaysRequest,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    if let Err(msg) = validate_holidays(&req.holidays) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::HolidayInvalid, msg)));
    }
    let academic_year = match resolve_academic_year(req.academic_year) {
        Ok(year) => year,
        Err(resp) => return Ok(resp),
    };

    let storage = service.get_storage(request);
    match storage
        .replace_holidays(&academic_year, req.holidays, user_id)
        .await
    {
        Ok(items) => {
            if let Some(cache) = service.get_cache(request) {
                cache.remove(&keys::current_holidays(&academic_year)).await;
            }
            info!(
                "Holidays for {} replaced by user {} ({} periods)",
                academic_year,
                user_id,
                items.len()
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                HolidayListResponse { items },
                "Holidays saved",
            )))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to save holidays: {e}"),
            )),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::calendar::entities::HolidayType;
    use chrono::NaiveDate;

    fn period(name: &str, start: (i32, u32, u32), end: (i32, u32, u32)) -> HolidayPeriod {
        HolidayPeriod {
            name: name.to_string(),
            start_date: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            end_date: NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
            holiday_type: HolidayType::Regular,
        }
    }

    #[test]
    fn test_single_day_holiday_is_valid() {
        let holidays = [period("Aïd El Adha", (2025, 6, 6), (2025, 6, 6))];
        assert!(validate_holidays(&holidays).is_ok());
    }

    #[test]
    fn test_inverted_holiday_is_rejected() {
        let holidays = [period("Noël", (2025, 1, 5), (2024, 12, 23))];
        assert!(validate_holidays(&holidays).unwrap_err().contains("Noël"));
        assert!(validate_holidays(&[period(" ", (2025, 1, 1), (2025, 1, 2))]).is_err());
    }

    #[test]
    fn test_default_holidays_pass_validation() {
        assert!(validate_holidays(&default_holidays(2024)).is_ok());
    }
}
