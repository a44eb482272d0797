use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::CalendarService;
use crate::cache::{CacheResult, ObjectCacheExt, keys};
use crate::config::AppConfig;
use crate::middlewares::RequireJWT;
use crate::models::calendar::entities::SchedulePeriod;
use crate::models::calendar::requests::SaveScheduleRequest;
use crate::models::calendar::responses::CurrentScheduleResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::courses::create::resolve_academic_year;
use crate::utils::calendar::default_schedule;
use crate::utils::timeslot::{ranges_overlap, validate_range};

/// 每节时间合法，同一时段内序号不重复且时间不重叠
pub(super) fn validate_schedule(periods: &[SchedulePeriod]) -> Result<(), String> {
    if periods.is_empty() {
        return Err("Schedule must contain at least one period".to_string());
    }

    let mut parsed = Vec::with_capacity(periods.len());
    for period in periods {
        parsed.push((period, validate_range(&period.start_time, &period.end_time)?));
    }

    for (i, (period, range)) in parsed.iter().enumerate() {
        for (other, other_range) in parsed.iter().skip(i + 1) {
            if period.day != other.day {
                continue;
            }
            if period.order_number == other.order_number {
                return Err(format!(
                    "Duplicate order number {} on {}",
                    period.order_number, period.day
                ));
            }
            if ranges_overlap(*range, *other_range) {
                return Err(format!(
                    "Periods {}-{} and {}-{} overlap on {}",
                    period.start_time, period.end_time, other.start_time, other.end_time, period.day
                ));
            }
        }
    }
    Ok(())
}

pub async fn get_current_schedule(
    service: &CalendarService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let academic_year = AppConfig::get().current_academic_year();
    let cache = service.get_cache(request);
    let cache_key = keys::current_schedule(&academic_year);

    if let Some(cache) = &cache
        && let CacheResult::Found(response) =
            cache.get_json::<CurrentScheduleResponse>(&cache_key).await
    {
        return Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Current schedule retrieved successfully",
        )));
    }

    let storage = service.get_storage(request);
    let response = match storage.get_active_schedule(&academic_year).await {
        Ok(Some(config)) => CurrentScheduleResponse {
            academic_year,
            is_default: false,
            config_id: Some(config.id),
            periods: config.periods,
        },
        Ok(None) => CurrentScheduleResponse {
            academic_year,
            is_default: true,
            config_id: None,
            periods: default_schedule(),
        },
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to get schedule: {e}"),
                )),
            );
        }
    };

    if let Some(cache) = &cache {
        cache.insert_json(&cache_key, &response, 0).await;
    }
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Current schedule retrieved successfully",
    )))
}

pub async fn save_schedule(
    service: &CalendarService,
    request: &HttpRequest,
    req: SaveScheduleRequest,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    if let Err(msg) = validate_schedule(&req.periods) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ScheduleInvalid, msg)));
    }
    let academic_year = match resolve_academic_year(req.academic_year) {
        Ok(year) => year,
        Err(resp) => return Ok(resp),
    };

    let storage = service.get_storage(request);
    match storage
        .replace_schedule(&academic_year, req.periods, user_id)
        .await
    {
        Ok(config) => {
            if let Some(cache) = service.get_cache(request) {
                cache.remove(&keys::current_schedule(&academic_year)).await;
            }
            info!(
                "Schedule for {} replaced by user {} (config {})",
                academic_year, user_id, config.id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(config, "Schedule saved")))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to save schedule: {e}"),
            )),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::calendar::entities::PeriodType;
    use crate::models::courses::entities::TimeSlotDay;

    fn period(start: &str, end: &str, order: i32) -> SchedulePeriod {
        SchedulePeriod {
            day: TimeSlotDay::SaturdayMorning,
            start_time: start.to_string(),
            end_time: end.to_string(),
            order_number: order,
            period_type: PeriodType::Class,
        }
    }

    #[test]
    fn test_default_schedule_is_valid() {
        assert!(validate_schedule(&default_schedule()).is_ok());
    }

    #[test]
    fn test_overlapping_periods_rejected() {
        let periods = [period("09:00", "10:30", 1), period("10:00", "11:00", 2)];
        assert!(validate_schedule(&periods).unwrap_err().contains("overlap"));
    }

    #[test]
    fn test_duplicate_order_rejected() {
        let periods = [period("09:00", "10:00", 1), period("10:00", "11:00", 1)];
        assert!(validate_schedule(&periods).unwrap_err().contains("order"));
        assert!(validate_schedule(&[]).is_err());
    }
}
