//! 学生与课时统计的重算
//!
//! 每次写考勤、表现或成绩后先更新课时滚动统计，再逐个重算受影响学生的持久化统计。
//! 重算失败只记录日志，不影响已经成功的写操作。

use std::collections::BTreeSet;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{debug, info, warn};

use super::StatsService;

use crate::errors::Result;
use crate::models::stats::entities::{
    AttendanceSummary, BehaviorSummary, GradeSummary, StudentStats,
};
use crate::models::stats::responses::RefreshStatsResponse;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;
use crate::utils::stats::{attendance_summary, behavior_summary, build_student_stats, grade_summary};

/// 触发重算的表类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SheetKind {
    Attendance,
    Behavior,
    Grade,
}

pub(crate) struct StudentOverview {
    pub attendance: AttendanceSummary,
    pub behavior: BehaviorSummary,
    pub grades: GradeSummary,
}

pub(crate) async fn student_overview(
    storage: &dyn Storage,
    student_id: i64,
) -> Result<StudentOverview> {
    let attendance = storage.list_student_attendance(student_id).await?;
    let behavior = storage.list_student_behavior(student_id).await?;
    let grades = storage.list_student_grades(student_id).await?;

    Ok(StudentOverview {
        attendance: attendance_summary(&attendance),
        behavior: behavior_summary(&behavior),
        grades: grade_summary(&grades),
    })
}

pub(crate) async fn refresh_student_stats(
    storage: &dyn Storage,
    student_id: i64,
) -> Result<StudentStats> {
    let overview = student_overview(storage, student_id).await?;
    let stats = build_student_stats(
        student_id,
        &overview.attendance,
        &overview.behavior,
        &overview.grades,
        chrono::Utc::now(),
    );
    storage.upsert_student_stats(stats.clone()).await?;
    Ok(stats)
}

pub(crate) async fn refresh_session_stats(
    storage: &dyn Storage,
    session_id: i64,
    kind: SheetKind,
) -> Result<()> {
    let value = match kind {
        SheetKind::Attendance => storage.refresh_session_attendance_stats(session_id).await?,
        SheetKind::Behavior => storage.refresh_session_behavior_stats(session_id).await?,
        SheetKind::Grade => storage.refresh_session_grade_stats(session_id).await?,
    };
    debug!("Session {} {:?} average is now {:?}", session_id, kind, value);
    Ok(())
}

/// 写表后的统计更新
pub(crate) async fn refresh_after_write(
    storage: &dyn Storage,
    session_id: i64,
    kind: SheetKind,
    student_ids: BTreeSet<i64>,
) {
    if let Err(e) = refresh_session_stats(storage, session_id, kind).await {
        warn!("Failed to refresh session {} stats: {}", session_id, e);
    }
    for student_id in student_ids {
        if let Err(e) = refresh_student_stats(storage, student_id).await {
            warn!("Failed to refresh stats of student {}: {}", student_id, e);
        }
    }
}

/// 全量重算：所有在读学生与所有有效课时
pub(crate) async fn refresh_all(storage: &dyn Storage) -> Result<RefreshStatsResponse> {
    let students = storage.list_active_users_by_role(UserRole::Student).await?;
    let mut students_updated = 0;
    for student in &students {
        match refresh_student_stats(storage, student.id).await {
            Ok(_) => students_updated += 1,
            Err(e) => warn!("Failed to refresh stats of student {}: {}", student.id, e),
        }
    }

    let session_ids = storage.list_active_session_ids().await?;
    let mut sessions_updated = 0;
    for session_id in session_ids {
        let mut ok = true;
        for kind in [SheetKind::Attendance, SheetKind::Behavior, SheetKind::Grade] {
            if let Err(e) = refresh_session_stats(storage, session_id, kind).await {
                warn!("Failed to refresh session {} stats: {}", session_id, e);
                ok = false;
            }
        }
        if ok {
            sessions_updated += 1;
        }
    }

    Ok(RefreshStatsResponse {
        students_updated,
        sessions_updated,
    })
}

pub async fn handle_refresh_stats(
    service: &StatsService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match refresh_all(storage.as_ref()).await {
        Ok(response) => {
            info!(
                "Stats refreshed: {} students, {} sessions",
                response.students_updated, response.sessions_updated
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Stats refreshed")))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to refresh stats: {e}"),
            )),
        ),
    }
}

/// 更新前后两份名单的并集，被移出名单的学生也要重算
pub(crate) fn affected_students(
    before: impl IntoIterator<Item = i64>,
    after: impl IntoIterator<Item = i64>,
) -> BTreeSet<i64> {
    before.into_iter().chain(after).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affected_students_union() {
        let ids = affected_students([3, 1, 2], [2, 5]);
        assert_eq!(ids.into_iter().collect::<Vec<_>>(), vec![1, 2, 3, 5]);
    }
}
