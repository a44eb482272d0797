//! 课堂表现存储操作

use std::collections::HashMap;

use chrono::NaiveDate;

use super::SeaOrmStorage;
use crate::entity::prelude::*;
use crate::entity::{active_sheet_key, behavior_records, behaviors, course_sessions, format_date};
use crate::errors::{Result, SchoolHubError};
use crate::models::behaviors::{
    entities::{Behavior, BehaviorDetail, StudentBehaviorEntry},
    requests::BehaviorRecordInput,
};
use crate::utils::stats::{SheetHeader, behavior_rate, mean, round2};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

async fn insert_records<C: ConnectionTrait>(
    conn: &C,
    behavior_id: i64,
    records: &[BehaviorRecordInput],
) -> Result<()> {
    for record in records {
        BehaviorRecordActiveModel {
            behavior_id: Set(behavior_id),
            student_id: Set(record.student_id),
            rating: Set(record.rating),
            comment: Set(record.comment.clone()),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| SchoolHubError::database_operation(format!("写入表现记录失败: {e}")))?;
    }
    Ok(())
}

fn rate_of(records: &[BehaviorRecordInput]) -> f64 {
    let ratings: Vec<i32> = records.iter().map(|r| r.rating).collect();
    behavior_rate(&ratings)
}

/// 同一课时同一天的有效表（可排除自身）
async fn active_sheet_in<C: ConnectionTrait>(
    conn: &C,
    session_id: i64,
    day: &str,
    exclude_id: Option<i64>,
) -> Result<Option<behaviors::Model>> {
    let mut select = Behaviors::find()
        .filter(behaviors::Column::SessionId.eq(session_id))
        .filter(behaviors::Column::Date.eq(day))
        .filter(behaviors::Column::IsActive.eq(true));
    if let Some(id) = exclude_id {
        select = select.filter(behaviors::Column::Id.ne(id));
    }
    select
        .one(conn)
        .await
        .map_err(|e| SchoolHubError::database_operation(format!("查询表现表失败: {e}")))
}

impl SeaOrmStorage {
    /// 创建表现表
    pub async fn create_behavior_impl(
        &self,
        session_id: i64,
        created_by: i64,
        date: NaiveDate,
        records: Vec<BehaviorRecordInput>,
    ) -> Result<BehaviorDetail> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("开启事务失败: {e}")))?;

        let day = format_date(date);
        if active_sheet_in(&txn, session_id, &day, None).await?.is_some() {
            return Err(SchoolHubError::conflict(format!(
                "A behavior sheet already exists for session {session_id} on {day}"
            )));
        }

        let sheet = BehaviorActiveModel {
            session_id: Set(session_id),
            date: Set(day.clone()),
            behavior_rate: Set(rate_of(&records)),
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
        .map_err(|e| SchoolHubError::database_operation(format!("创建表现表失败: {e}")))?;

        insert_records(&txn, sheet.id, &records).await?;

        txn.commit()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("提交事务失败: {e}")))?;

        self.get_behavior_impl(sheet.id)
            .await?
            .ok_or_else(|| SchoolHubError::not_found("Behavior not found after creation"))
    }

    pub async fn get_behavior_impl(&self, behavior_id: i64) -> Result<Option<BehaviorDetail>> {
        let Some(sheet) = Behaviors::find_by_id(behavior_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询表现表失败: {e}")))?
        else {
            return Ok(None);
        };

        let records = BehaviorRecords::find()
            .filter(behavior_records::Column::BehaviorId.eq(behavior_id))
            .order_by_asc(behavior_records::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询表现记录失败: {e}")))?;

        Ok(Some(BehaviorDetail {
            behavior: sheet.into_behavior(),
            records: records.into_iter().map(|r| r.into_record()).collect(),
        }))
    }

    pub async fn list_session_behaviors_impl(
        &self,
        session_id: i64,
        date: Option<NaiveDate>,
        include_inactive: bool,
    ) -> Result<Vec<Behavior>> {
        let mut select = Behaviors::find().filter(behaviors::Column::SessionId.eq(session_id));

        if let Some(date) = date {
            select = select.filter(behaviors::Column::Date.eq(format_date(date)));
        }
        if !include_inactive {
            select = select.filter(behaviors::Column::IsActive.eq(true));
        }

        let models = select
            .order_by_desc(behaviors::Column::Date)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询表现列表失败: {e}")))?;

        Ok(models.into_iter().map(|m| m.into_behavior()).collect())
    }

    /// 整体替换表现记录并重算平均评分
    pub async fn update_behavior_impl(
        &self,
        behavior_id: i64,
        records: Vec<BehaviorRecordInput>,
    ) -> Result<Option<BehaviorDetail>> {
        // 已删除的表不可修改
        let existing = Behaviors::find_by_id(behavior_id)
            .filter(behaviors::Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询表现表失败: {e}")))?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("开启事务失败: {e}")))?;

        BehaviorRecords::delete_many()
            .filter(behavior_records::Column::BehaviorId.eq(behavior_id))
            .exec(&txn)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("清除表现记录失败: {e}")))?;
        insert_records(&txn, behavior_id, &records).await?;

        BehaviorActiveModel {
            id: Set(behavior_id),
            behavior_rate: Set(rate_of(&records)),
            total_students: Set(records.len() as i32),
            last_update: Set(now),
            ..Default::default()
        }
        .update(&txn)
        .await
        .map_err(|e| SchoolHubError::database_operation(format!("更新表现表失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("提交事务失败: {e}")))?;

        self.get_behavior_impl(behavior_id).await
    }

    /// 软删除或恢复；恢复时同一天已有有效表则返回冲突
    pub async fn set_behavior_active_impl(&self, behavior_id: i64, active: bool) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(sheet) = Behaviors::find_by_id(behavior_id)
            .one(&txn)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询表现表失败: {e}")))?
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

        let result = Behaviors::update_many()
            .col_expr(behaviors::Column::IsActive, sea_orm::sea_query::Expr::value(active))
            .col_expr(behaviors::Column::ActiveKey, sea_orm::sea_query::Expr::value(active_key))
            .col_expr(
                behaviors::Column::DeletedAt,
                sea_orm::sea_query::Expr::value((!active).then_some(now)),
            )
            .col_expr(behaviors::Column::LastUpdate, sea_orm::sea_query::Expr::value(now))
            .filter(behaviors::Column::Id.eq(behavior_id))
            .exec(&txn)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("更新表现表状态失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 学生在有效表现表中的记录，按日期、表 ID 升序
    pub async fn list_student_behavior_impl(
        &self,
        student_id: i64,
    ) -> Result<Vec<StudentBehaviorEntry>> {
        let records = BehaviorRecords::find()
            .filter(behavior_records::Column::StudentId.eq(student_id))
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询表现记录失败: {e}")))?;
        if records.is_empty() {
            return Ok(vec![]);
        }

        let sheets = Behaviors::find()
            .filter(behaviors::Column::Id.is_in(records.iter().map(|r| r.behavior_id)))
            .filter(behaviors::Column::IsActive.eq(true))
            .order_by_asc(behaviors::Column::Date)
            .order_by_asc(behaviors::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询表现表失败: {e}")))?;
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

        let by_sheet: HashMap<i64, behavior_records::Model> =
            records.into_iter().map(|r| (r.behavior_id, r)).collect();

        Ok(sheets
            .into_iter()
            .filter_map(|sheet| {
                let record = by_sheet.get(&sheet.id)?;
                let subject = *subjects.get(&sheet.session_id)?;
                let header = sheet.header();
                Some(StudentBehaviorEntry {
                    behavior_id: sheet.id,
                    session_id: sheet.session_id,
                    subject,
                    date: header.date,
                    rating: record.rating,
                    comment: record.comment.clone(),
                    last_update: header.last_update,
                })
            })
            .collect())
    }

    pub async fn list_active_behavior_headers_impl(&self) -> Result<Vec<SheetHeader>> {
        let sheets = Behaviors::find()
            .filter(behaviors::Column::IsActive.eq(true))
            .order_by_asc(behaviors::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询表现表失败: {e}")))?;
        Ok(sheets.iter().map(|s| s.header()).collect())
    }

    pub async fn deactivate_behaviors_impl(&self, ids: &[i64]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let now = chrono::Utc::now().timestamp();

        let result = Behaviors::update_many()
            .col_expr(behaviors::Column::IsActive, sea_orm::sea_query::Expr::value(false))
            .col_expr(
                behaviors::Column::ActiveKey,
                sea_orm::sea_query::Expr::value(Option::<String>::None),
            )
            .col_expr(behaviors::Column::DeletedAt, sea_orm::sea_query::Expr::value(now))
            .filter(behaviors::Column::Id.is_in(ids.to_vec()))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("停用表现表失败: {e}")))?;

        Ok(result.rows_affected)
    }

    /// 课时平均表现 = 有效表现表平均评分的平均值
    pub async fn refresh_session_behavior_stats_impl(
        &self,
        session_id: i64,
    ) -> Result<Option<f64>> {
        let sheets = Behaviors::find()
            .filter(behaviors::Column::SessionId.eq(session_id))
            .filter(behaviors::Column::IsActive.eq(true))
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询表现表失败: {e}")))?;

        let average = mean(sheets.iter().map(|s| s.behavior_rate)).map(round2);
        let now = chrono::Utc::now().timestamp();

        CourseSessions::update_many()
            .col_expr(
                course_sessions::Column::StatsAverageBehavior,
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::test_support::{memory_storage, seed_session};

    fn ratings(student_ids: &[i64], values: &[i32]) -> Vec<BehaviorRecordInput> {
        student_ids
            .iter()
            .zip(values)
            .map(|(id, rating)| BehaviorRecordInput {
                student_id: *id,
                rating: *rating,
                comment: None,
            })
            .collect()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 11, d).unwrap()
    }

    #[tokio::test]
    async fn test_duplicate_and_restore_conflicts() {
        let storage = memory_storage().await;
        let fx = seed_session(&storage).await;
        let old = storage
            .create_behavior_impl(fx.session_id, fx.teacher_id, day(4), ratings(&fx.student_ids, &[4, 2]))
            .await
            .unwrap();

        let err = storage
            .create_behavior_impl(fx.session_id, fx.teacher_id, day(4), ratings(&fx.student_ids, &[5, 5]))
            .await
            .unwrap_err();
        assert!(err.is_conflict());

        storage.set_behavior_active_impl(old.behavior.id, false).await.unwrap();
        storage
            .create_behavior_impl(fx.session_id, fx.teacher_id, day(4), ratings(&fx.student_ids, &[5, 5]))
            .await
            .unwrap();
        let err = storage
            .set_behavior_active_impl(old.behavior.id, true)
            .await
            .unwrap_err();
        assert!(err.is_conflict());

        // 已删除的表不能修改
        let updated = storage
            .update_behavior_impl(old.behavior.id, ratings(&fx.student_ids, &[1, 1]))
            .await
            .unwrap();
        assert!(updated.is_none());
    }

    #[tokio::test]
    async fn test_session_behavior_average_refresh() {
        let storage = memory_storage().await;
        let fx = seed_session(&storage).await;
        storage
            .create_behavior_impl(fx.session_id, fx.teacher_id, day(4), ratings(&fx.student_ids, &[4, 2]))
            .await
            .unwrap();
        storage
            .create_behavior_impl(fx.session_id, fx.teacher_id, day(11), ratings(&fx.student_ids, &[5, 5]))
            .await
            .unwrap();

        let average = storage
            .refresh_session_behavior_stats_impl(fx.session_id)
            .await
            .unwrap();
        assert_eq!(average, Some(4.0));
        let session = CourseSessions::find_by_id(fx.session_id)
            .one(&storage.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(session.stats_average_behavior, Some(4.0));
    }
}
