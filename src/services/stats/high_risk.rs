use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StatsService;
use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::stats::requests::HighRiskQuery;
use crate::models::stats::responses::HighRiskResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;
use crate::utils::stats::{RiskCandidate, RiskThresholds, classify_risk, high_risk_students};

/// 先按缺勤次数筛出入围学生，再批量取最近缺勤日期
async fn collect_candidates(
    storage: &dyn Storage,
    thresholds: RiskThresholds,
) -> Result<Vec<RiskCandidate>> {
    let stats: Vec<_> = storage
        .list_absent_student_stats()
        .await?
        .into_iter()
        .filter(|s| classify_risk(s.absences_count, thresholds).is_some())
        .collect();
    if stats.is_empty() {
        return Ok(vec![]);
    }

    let ids: Vec<i64> = stats.iter().map(|s| s.student_id).collect();
    let students = storage.get_users_by_ids(&ids).await?;
    let last_absences = storage.last_absence_dates(&ids).await?;

    Ok(stats
        .into_iter()
        .filter_map(|stat| {
            let student = students
                .iter()
                .find(|u| u.id == stat.student_id && u.is_available())?;
            Some(RiskCandidate {
                student: student.clone(),
                absences_count: stat.absences_count,
                last_absence_date: last_absences.get(&stat.student_id).copied(),
            })
        })
        .collect())
}

pub async fn list_high_risk_students(
    service: &StatsService,
    request: &HttpRequest,
    query: HighRiskQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let thresholds = RiskThresholds::from(&AppConfig::get().school);

    let candidates = match collect_candidates(storage.as_ref(), thresholds).await {
        Ok(candidates) => candidates,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to get high-risk students: {e}"),
                )),
            );
        }
    };

    let today = chrono::Utc::now().date_naive();
    let (items, summary) = high_risk_students(candidates, thresholds, today, query.sort);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        HighRiskResponse { items, summary },
        "High-risk students retrieved successfully",
    )))
}
