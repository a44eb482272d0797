//! 一次性维护任务：清理重复表、全量重算统计

use std::collections::BTreeSet;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::MaintenanceService;
use crate::errors::Result;
use crate::models::maintenance::{MaintenanceReport, MaintenanceTask};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::stats::refresh::{
    SheetKind, refresh_all, refresh_session_stats, refresh_student_stats,
};
use crate::storage::Storage;
use crate::utils::stats::{SheetHeader, sheets_to_deactivate};

async fn sheet_students(storage: &dyn Storage, kind: SheetKind, sheet_id: i64) -> Result<Vec<i64>> {
    let ids = match kind {
        SheetKind::Attendance => storage
            .get_attendance(sheet_id)
            .await?
            .map(|d| d.records.iter().map(|r| r.student_id).collect()),
        _ => storage
            .get_behavior(sheet_id)
            .await?
            .map(|d| d.records.iter().map(|r| r.student_id).collect()),
    };
    Ok(ids.unwrap_or_default())
}

/// 停用后受影响的课时与学生都要重算
async fn dedupe(
    storage: &dyn Storage,
    task: MaintenanceTask,
    kind: SheetKind,
) -> Result<MaintenanceReport> {
    let headers: Vec<SheetHeader> = match kind {
        SheetKind::Attendance => storage.list_active_attendance_headers().await?,
        _ => storage.list_active_behavior_headers().await?,
    };
    let ids = sheets_to_deactivate(&headers);
    if ids.is_empty() {
        return Ok(MaintenanceReport {
            task,
            scanned: headers.len() as i32,
            affected: 0,
            details: vec![],
        });
    }

    let mut details = Vec::with_capacity(ids.len());
    let mut sessions = BTreeSet::new();
    let mut students = BTreeSet::new();
    for header in headers.iter().filter(|h| ids.contains(&h.id)) {
        details.push(format!(
            "sheet {} of session {} on {} deactivated",
            header.id, header.session_id, header.date
        ));
        sessions.insert(header.session_id);
        students.extend(sheet_students(storage, kind, header.id).await?);
    }

    let affected = match kind {
        SheetKind::Attendance => storage.deactivate_attendances(&ids).await?,
        _ => storage.deactivate_behaviors(&ids).await?,
    };

    for session_id in sessions {
        if let Err(e) = refresh_session_stats(storage, session_id, kind).await {
            warn!("Failed to refresh session {} stats: {}", session_id, e);
        }
    }
    for student_id in students {
        if let Err(e) = refresh_student_stats(storage, student_id).await {
            warn!("Failed to refresh stats of student {}: {}", student_id, e);
        }
    }

    Ok(MaintenanceReport {
        task,
        scanned: headers.len() as i32,
        affected: affected as i32,
        details,
    })
}

async fn execute(storage: &dyn Storage, task: MaintenanceTask) -> Result<MaintenanceReport> {
    match task {
        MaintenanceTask::DedupeAttendances => dedupe(storage, task, SheetKind::Attendance).await,
        MaintenanceTask::DedupeBehaviors => dedupe(storage, task, SheetKind::Behavior).await,
        MaintenanceTask::RecomputeStats => {
            let response = refresh_all(storage).await?;
            Ok(MaintenanceReport {
                task,
                scanned: response.students_updated + response.sessions_updated,
                affected: response.students_updated,
                details: vec![
                    format!("{} students recomputed", response.students_updated),
                    format!("{} sessions recomputed", response.sessions_updated),
                ],
            })
        }
    }
}

pub async fn run_task(
    service: &MaintenanceService,
    request: &HttpRequest,
    task: &str,
) -> ActixResult<HttpResponse> {
    let task: MaintenanceTask = match task.parse() {
        Ok(task) => task,
        Err(msg) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::MaintenanceTaskUnknown,
                msg,
            )));
        }
    };
    let storage = service.get_storage(request);

    match execute(storage.as_ref(), task).await {
        Ok(report) => {
            info!(
                "Maintenance task {:?} finished: scanned {}, affected {}",
                task, report.scanned, report.affected
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(report, "Maintenance task completed")))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Maintenance task failed: {e}"),
            )),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::prelude::*;
    use crate::storage::sea_orm_storage::test_support::{memory_storage, seed_session};
    use sea_orm::{ActiveModelTrait, EntityTrait, Set};

    // 唯一约束之前写入的重复表：active_key 为空
    async fn legacy_sheet(
        storage: &crate::storage::sea_orm_storage::SeaOrmStorage,
        session_id: i64,
        created_by: i64,
        last_update: i64,
    ) -> i64 {
        AttendanceActiveModel {
            session_id: Set(session_id),
            date: Set("2024-10-07".to_string()),
            presence_rate: Set(100.0),
            total_students: Set(0),
            created_by: Set(created_by),
            is_active: Set(true),
            active_key: Set(None),
            last_update: Set(last_update),
            created_at: Set(last_update),
            ..Default::default()
        }
        .insert(&storage.db)
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn test_dedupe_keeps_latest_sheet() {
        let storage = memory_storage().await;
        let fx = seed_session(&storage).await;
        let older = legacy_sheet(&storage, fx.session_id, fx.teacher_id, 1_700_000_000).await;
        let newer = legacy_sheet(&storage, fx.session_id, fx.teacher_id, 1_700_000_500).await;

        let report = dedupe(&storage, MaintenanceTask::DedupeAttendances, SheetKind::Attendance)
            .await
            .unwrap();
        assert_eq!(report.scanned, 2);
        assert_eq!(report.affected, 1);
        assert_eq!(report.details.len(), 1);

        let older = Attendances::find_by_id(older).one(&storage.db).await.unwrap().unwrap();
        let newer = Attendances::find_by_id(newer).one(&storage.db).await.unwrap().unwrap();
        assert!(!older.is_active);
        assert!(older.deleted_at.is_some());
        assert!(newer.is_active);

        // 再跑一次没有可清理的
        let report = dedupe(&storage, MaintenanceTask::DedupeAttendances, SheetKind::Attendance)
            .await
            .unwrap();
        assert_eq!(report.affected, 0);
    }
}
