//! 考勤存储操作

use std::collections::HashMap;

use chrono::NaiveDate;

use super::SeaOrmStorage;
use crate::entity::prelude::*;
use crate::entity::{active_sheet_key, attendance_records, attendances, course_sessions, format_date};
use crate::errors::{Result, SchoolHubError};
use crate::models::attendances::{
    entities::{Attendance, AttendanceDetail, StudentAttendanceEntry},
    requests::AttendanceRecordInput,
};
use crate::utils::stats::{SheetHeader, mean, presence_rate, round2};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

async fn insert_records<C: ConnectionTrait>(
    conn: &C,
    attendance_id: i64,
    records: &[AttendanceRecordInput],
) -> Result<()> {
    for record in records {
        AttendanceRecordActiveModel {
            attendance_id: Set(attendance_id),
            student_id: Set(record.student_id),
            is_present: Set(record.is_present),
            comment: Set(record.comment.clone()),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| SchoolHubError::database_operation(format!("写入考勤记录失败: {e}")))?;
    }
    Ok(())
}

fn rate_of(records: &[AttendanceRecordInput]) -> f64 {
    let present = records.iter().filter(|r| r.is_present).count();
    presence_rate(present, records.len())
}

/// 同一课时同一天的有效表（可排除自身）
async fn active_sheet_in<C: ConnectionTrait>(
    conn: &C,
    session_id: i64,
    day: &str,
    exclude_id: Option<i64>,
) -> Result<Option<attendances::Model>> {
    let mut select = Attendances::find()
        .filter(attendances::Column::SessionId.eq(session_id))
        .filter(attendances::Column::Date.eq(day))
        .filter(attendances::Column::IsActive.eq(true));
    if let Some(id) = exclude_id {
        select = select.filter(attendances::Column::Id.ne(id));
    }
    select
        .one(conn)
        .await
        .map_err(|e| SchoolHubError::database_operation(format!("查询考勤表失败: {e}")))
}

impl SeaOrmStorage {
    /// 创建考勤表
    pub async fn create_attendance_impl(
        &self,
        session_id: i64,
        created_by: i64,
        date: NaiveDate,
        records: Vec<AttendanceRecordInput>,
    ) -> Result<AttendanceDetail> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("开启事务失败: {e}")))?;

        let day = format_date(date);
        if active_sheet_in(&txn, session_id, &day, None).await?.is_some() {
            return Err(SchoolHubError::conflict(format!(
                "An attendance sheet already exists for session {session_id} on {day}"
            )));
        }

        let sheet = AttendanceActiveModel {
            session_id: Set(session_id),
            date: Set(day.clone()),
            presence_rate: Set(rate_of(&records)),
            total_students: Set(records.len() as i32),
            created_by: Set(created_by),
            is_active: Set(true),
            active_key: Set(Some(active_sheet_key(session_id, &day))),
            last_update: Set(now),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| SchoolHubError::database_operation(format!("创建考勤表失败: {e}")))?;

        insert_records(&txn, sheet.id, &records).await?;

        txn.commit()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("提交事务失败: {e}")))?;

        self.get_attendance_impl(sheet.id)
            .await?
            .ok_or_else(|| SchoolHubError::not_found("Attendance not found after creation"))
    }

    pub async fn get_attendance_impl(&self, attendance_id: i64) -> Result<Option<AttendanceDetail>> {
        let Some(sheet) = Attendances::find_by_id(attendance_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询考勤表失败: {e}")))?
        else {
            return Ok(None);
        };

        let records = AttendanceRecords::find()
            .filter(attendance_records::Column::AttendanceId.eq(attendance_id))
            .order_by_asc(attendance_records::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询考勤记录失败: {e}")))?;

        Ok(Some(AttendanceDetail {
            attendance: sheet.into_attendance(),
            records: records.into_iter().map(|r| r.into_record()).collect(),
        }))
    }

    pub async fn list_session_attendances_impl(
        &self,
        session_id: i64,
        date: Option<NaiveDate>,
        include_inactive: bool,
    ) -> Result<Vec<Attendance>> {
        let mut select = Attendances::find().filter(attendances::Column::SessionId.eq(session_id));

        if let Some(date) = date {
            select = select.filter(attendances::Column::Date.eq(format_date(date)));
        }
        if !include_inactive {
            select = select.filter(attendances::Column::IsActive.eq(true));
        }

        let models = select
            .order_by_desc(attendances::Column::Date)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询考勤列表失败: {e}")))?;

        Ok(models.into_iter().map(|m| m.into_attendance()).collect())
    }

    /// 整体替换考勤记录并重算出勤率
    pub async fn update_attendance_impl(
        &self,
        attendance_id: i64,
        records: Vec<AttendanceRecordInput>,
    ) -> Result<Option<AttendanceDetail>> {
        // 已删除的表不可修改
        let existing = Attendances::find_by_id(attendance_id)
            .filter(attendances::Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询考勤表失败: {e}")))?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("开启事务失败: {e}")))?;

        AttendanceRecords::delete_many()
            .filter(attendance_records::Column::AttendanceId.eq(attendance_id))
            .exec(&txn)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("清除考勤记录失败: {e}")))?;
        insert_records(&txn, attendance_id, &records).await?;

        AttendanceActiveModel {
            id: Set(attendance_id),
            presence_rate: Set(rate_of(&records)),
            total_students: Set(records.len() as i32),
            last_update: Set(now),
            ..Default::default()
        }
        .update(&txn)
        .await
        .map_err(|e| SchoolHubError::database_operation(format!("更新考勤表失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("提交事务失败: {e}")))?;

        self.get_attendance_impl(attendance_id).await
    }

    /// 软删除或恢复；恢复时同一天已有有效表则返回冲突
    pub async fn set_attendance_active_impl(&self, attendance_id: i64, active: bool) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(sheet) = Attendances::find_by_id(attendance_id)
            .one(&txn)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询考勤表失败: {e}")))?
        else {
            return Ok(false);
        };

        let active_key = if active {
            if active_sheet_in(&txn, sheet.session_id, &sheet.date, Some(sheet.id))
                .await?
                .is_some()
            {
                return Err(SchoolHubError::conflict(format!(
                    "Another active sheet exists for session {} on {}",
                    sheet.session_id, sheet.date
                )));
            }
            Some(active_sheet_key(sheet.session_id, &sheet.date))
        } else {
            None
        };

        let result = Attendances::update_many()
            .col_expr(attendances::Column::IsActive, sea_orm::sea_query::Expr::value(active))
            .col_expr(attendances::Column::ActiveKey, sea_orm::sea_query::Expr::value(active_key))
            .col_expr(
                attendances::Column::DeletedAt,
                sea_orm::sea_query::Expr::value((!active).then_some(now)),
            )
            .col_expr(attendances::Column::LastUpdate, sea_orm::sea_query::Expr::value(now))
            .filter(attendances::Column::Id.eq(attendance_id))
            .exec(&txn)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("更新考勤表状态失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 学生在有效考勤表中的记录，按日期、表 ID 升序
    pub async fn list_student_attendance_impl(
        &self,
        student_id: i64,
    ) -> Result<Vec<StudentAttendanceEntry>> {
        let records = AttendanceRecords::find()
            .filter(attendance_records::Column::StudentId.eq(student_id))
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询考勤记录失败: {e}")))?;
        if records.is_empty() {
            return Ok(vec![]);
        }

        let sheets = Attendances::find()
            .filter(attendances::Column::Id.is_in(records.iter().map(|r| r.attendance_id)))
            .filter(attendances::Column::IsActive.eq(true))
            .order_by_asc(attendances::Column::Date)
            .order_by_asc(attendances::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询考勤表失败: {e}")))?;
        if sheets.is_empty() {
            return Ok(vec![]);
        }

        let subjects: HashMap<i64, _> = CourseSessions::find()
            .filter(course_sessions::Column::Id.is_in(sheets.iter().map(|s| s.session_id)))
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询课时失败: {e}")))?
            .into_iter()
            .map(|s| (s.id, s.parsed_subject()))
            .collect();

        let by_sheet: HashMap<i64, attendance_records::Model> =
            records.into_iter().map(|r| (r.attendance_id, r)).collect();

        Ok(sheets
            .into_iter()
            .filter_map(|sheet| {
                let record = by_sheet.get(&sheet.id)?;
                let subject = *subjects.get(&sheet.session_id)?;
                let header = sheet.header();
                Some(StudentAttendanceEntry {
                    attendance_id: sheet.id,
                    session_id: sheet.session_id,
                    subject,
                    date: header.date,
                    is_present: record.is_present,
                    comment: record.comment.clone(),
                    last_update: header.last_update,
                })
            })
            .collect())
    }

    pub async fn last_absence_dates_impl(
        &self,
        student_ids: &[i64],
    ) -> Result<HashMap<i64, NaiveDate>> {
        if student_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let absences = AttendanceRecords::find()
            .filter(attendance_records::Column::StudentId.is_in(student_ids.to_vec()))
            .filter(attendance_records::Column::IsPresent.eq(false))
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询缺勤记录失败: {e}")))?;
        if absences.is_empty() {
            return Ok(HashMap::new());
        }

        let dates: HashMap<i64, NaiveDate> = Attendances::find()
            .filter(attendances::Column::Id.is_in(absences.iter().map(|r| r.attendance_id)))
            .filter(attendances::Column::IsActive.eq(true))
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询考勤表失败: {e}")))?
            .into_iter()
            .map(|sheet| (sheet.id, sheet.header().date))
            .collect();

        let mut latest: HashMap<i64, NaiveDate> = HashMap::new();
        for record in absences {
            let Some(date) = dates.get(&record.attendance_id) else {
                continue;
            };
            latest
                .entry(record.student_id)
                .and_modify(|d| *d = (*d).max(*date))
                .or_insert(*date);
        }
        Ok(latest)
    }

    pub async fn list_active_attendance_headers_impl(&self) -> Result<Vec<SheetHeader>> {
        let sheets = Attendances::find()
            .filter(attendances::Column::IsActive.eq(true))
            .order_by_asc(attendances::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询考勤表失败: {e}")))?;
        Ok(sheets.iter().map(|s| s.header()).collect())
    }

    pub async fn deactivate_attendances_impl(&self, ids: &[i64]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let now = chrono::Utc::now().timestamp();

        let result = Attendances::update_many()
            .col_expr(attendances::Column::IsActive, sea_orm::sea_query::Expr::value(false))
            .col_expr(
                attendances::Column::ActiveKey,
                sea_orm::sea_query::Expr::value(Option::<String>::None),
            )
            .col_expr(attendances::Column::DeletedAt, sea_orm::sea_query::Expr::value(now))
            .filter(attendances::Column::Id.is_in(ids.to_vec()))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("停用考勤表失败: {e}")))?;

        Ok(result.rows_affected)
    }

    /// 课时平均出勤率 = 有效考勤表出勤率的平均值
    pub async fn refresh_session_attendance_stats_impl(
        &self,
        session_id: i64,
    ) -> Result<Option<f64>> {
        let sheets = Attendances::find()
            .filter(attendances::Column::SessionId.eq(session_id))
            .filter(attendances::Column::IsActive.eq(true))
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询考勤表失败: {e}")))?;

        let average = mean(sheets.iter().map(|s| s.presence_rate)).map(round2);
        let now = chrono::Utc::now().timestamp();

        CourseSessions::update_many()
            .col_expr(
                course_sessions::Column::StatsAverageAttendance,
                sea_orm::sea_query::Expr::value(average),
            )
            .col_expr(
                course_sessions::Column::StatsLastUpdated,
                sea_orm::sea_query::Expr::value(now),
            )
            .filter(course_sessions::Column::Id.eq(session_id))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("更新课时统计失败: {e}")))?;

        Ok(average)
    }

    pub async fn average_presence_rate_impl(&self) -> Result<f64> {
        let sheets = Attendances::find()
            .filter(attendances::Column::IsActive.eq(true))
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询考勤表失败: {e}")))?;

        Ok(mean(sheets.iter().map(|s| s.presence_rate))
            .map(round2)
            .unwrap_or(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::test_support::{memory_storage, seed_session};

    fn records(student_ids: &[i64], present: &[bool]) -> Vec<AttendanceRecordInput> {
        student_ids
            .iter()
            .zip(present)
            .map(|(id, is_present)| AttendanceRecordInput {
                student_id: *id,
                is_present: *is_present,
                comment: None,
            })
            .collect()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 10, d).unwrap()
    }

    #[tokio::test]
    async fn test_second_active_sheet_same_day_conflicts() {
        let storage = memory_storage().await;
        let fx = seed_session(&storage).await;

        let first = storage
            .create_attendance_impl(
                fx.session_id,
                fx.teacher_id,
                day(7),
                records(&fx.student_ids, &[true, false]),
            )
            .await
            .unwrap();
        assert_eq!(first.attendance.presence_rate, 50.0);

        let err = storage
            .create_attendance_impl(
                fx.session_id,
                fx.teacher_id,
                day(7),
                records(&fx.student_ids, &[true, true]),
            )
            .await
            .unwrap_err();
        assert!(err.is_conflict());

        // 另一天不受影响
        storage
            .create_attendance_impl(
                fx.session_id,
                fx.teacher_id,
                day(8),
                records(&fx.student_ids, &[true, true]),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_unique_active_key_rejects_direct_duplicate() {
        let storage = memory_storage().await;
        let fx = seed_session(&storage).await;
        storage
            .create_attendance_impl(fx.session_id, fx.teacher_id, day(7), vec![])
            .await
            .unwrap();

        let now = chrono::Utc::now().timestamp();
        let day_str = format_date(day(7));
        let err = AttendanceActiveModel {
            session_id: Set(fx.session_id),
            date: Set(day_str.clone()),
            presence_rate: Set(0.0),
            total_students: Set(0),
            created_by: Set(fx.teacher_id),
            is_active: Set(true),
            active_key: Set(Some(active_sheet_key(fx.session_id, &day_str))),
            last_update: Set(now),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&storage.db)
        .await
        .map_err(|e| SchoolHubError::database_operation(e.to_string()))
        .unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_restore_conflicts_with_replacement_sheet() {
        let storage = memory_storage().await;
        let fx = seed_session(&storage).await;
        let old = storage
            .create_attendance_impl(
                fx.session_id,
                fx.teacher_id,
                day(7),
                records(&fx.student_ids, &[true, true]),
            )
            .await
            .unwrap();

        assert!(storage.set_attendance_active_impl(old.attendance.id, false).await.unwrap());
        let replacement = storage
            .create_attendance_impl(
                fx.session_id,
                fx.teacher_id,
                day(7),
                records(&fx.student_ids, &[false, true]),
            )
            .await
            .unwrap();

        let err = storage
            .set_attendance_active_impl(old.attendance.id, true)
            .await
            .unwrap_err();
        assert!(err.is_conflict());

        // 删掉替代表后即可恢复
        assert!(
            storage
                .set_attendance_active_impl(replacement.attendance.id, false)
                .await
                .unwrap()
        );
        assert!(storage.set_attendance_active_impl(old.attendance.id, true).await.unwrap());
        let restored = storage.get_attendance_impl(old.attendance.id).await.unwrap().unwrap();
        assert!(restored.attendance.is_active);
        assert!(restored.attendance.deleted_at.is_none());
    }

    #[tokio::test]
    async fn test_update_rejects_deleted_sheet() {
        let storage = memory_storage().await;
        let fx = seed_session(&storage).await;
        let sheet = storage
            .create_attendance_impl(
                fx.session_id,
                fx.teacher_id,
                day(7),
                records(&fx.student_ids, &[true, true]),
            )
            .await
            .unwrap();
        storage.set_attendance_active_impl(sheet.attendance.id, false).await.unwrap();

        let updated = storage
            .update_attendance_impl(sheet.attendance.id, records(&fx.student_ids, &[false, false]))
            .await
            .unwrap();
        assert!(updated.is_none());

        let unchanged = storage.get_attendance_impl(sheet.attendance.id).await.unwrap().unwrap();
        assert_eq!(unchanged.attendance.presence_rate, 100.0);
    }

    #[tokio::test]
    async fn test_session_attendance_average_follows_active_sheets() {
        let storage = memory_storage().await;
        let fx = seed_session(&storage).await;
        storage
            .create_attendance_impl(
                fx.session_id,
                fx.teacher_id,
                day(7),
                records(&fx.student_ids, &[true, true]),
            )
            .await
            .unwrap();
        let second = storage
            .create_attendance_impl(
                fx.session_id,
                fx.teacher_id,
                day(14),
                records(&fx.student_ids, &[true, false]),
            )
            .await
            .unwrap();

        let average = storage
            .refresh_session_attendance_stats_impl(fx.session_id)
            .await
            .unwrap();
        assert_eq!(average, Some(75.0));
        let session = CourseSessions::find_by_id(fx.session_id)
            .one(&storage.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(session.stats_average_attendance, Some(75.0));

        storage.set_attendance_active_impl(second.attendance.id, false).await.unwrap();
        let average = storage
            .refresh_session_attendance_stats_impl(fx.session_id)
            .await
            .unwrap();
        assert_eq!(average, Some(100.0));
    }

    #[tokio::test]
    async fn test_deactivate_clears_active_key() {
        let storage = memory_storage().await;
        let fx = seed_session(&storage).await;
        let sheet = storage
            .create_attendance_impl(fx.session_id, fx.teacher_id, day(7), vec![])
            .await
            .unwrap();

        assert_eq!(storage.deactivate_attendances_impl(&[sheet.attendance.id]).await.unwrap(), 1);
        let model = Attendances::find_by_id(sheet.attendance.id)
            .one(&storage.db)
            .await
            .unwrap()
            .unwrap();
        assert!(!model.is_active);
        assert!(model.active_key.is_none());
        assert!(model.deleted_at.is_some());

        // 停用后同一天可以重新建表
        storage
            .create_attendance_impl(fx.session_id, fx.teacher_id, day(7), vec![])
            .await
            .unwrap();
    }
}
