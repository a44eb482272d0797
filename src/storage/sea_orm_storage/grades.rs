//! 成绩存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::prelude::*;
use crate::entity::{course_sessions, format_date, grade_records, grades};
use crate::errors::{Result, SchoolHubError};
use crate::models::grades::{
    entities::{Grade, GradeDetail, GradeStats, StudentGradeEntry},
    requests::{CreateGradeRequest, GradeRecordInput, UpdateGradeRequest},
};
use crate::utils::stats::{grade_stats, session_grade_average};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

async fn insert_records<C: ConnectionTrait>(
    conn: &C,
    grade_id: i64,
    records: &[GradeRecordInput],
) -> Result<()> {
    for record in records {
        GradeRecordActiveModel {
            grade_id: Set(grade_id),
            student_id: Set(record.student_id),
            // 缺考不记分数
            value: Set(if record.is_absent { None } else { record.value }),
            is_absent: Set(record.is_absent),
            comment: Set(record.comment.clone()),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| SchoolHubError::database_operation(format!("写入成绩记录失败: {e}")))?;
    }
    Ok(())
}

fn stats_of(records: &[GradeRecordInput]) -> GradeStats {
    grade_stats(records.iter().map(|r| (r.value, r.is_absent)))
}

fn apply_stats(model: &mut GradeActiveModel, stats: GradeStats) {
    model.stats_average = Set(stats.average);
    model.stats_highest = Set(stats.highest);
    model.stats_lowest = Set(stats.lowest);
    model.stats_absent_count = Set(stats.absent_count);
    model.stats_total_students = Set(stats.total_students);
}

impl SeaOrmStorage {
    pub async fn create_grade_impl(
        &self,
        session_id: i64,
        created_by: i64,
        req: CreateGradeRequest,
    ) -> Result<GradeDetail> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("开启事务失败: {e}")))?;

        let mut model = GradeActiveModel {
            session_id: Set(session_id),
            date: Set(format_date(req.date)),
            grade_type: Set(req.grade_type.to_string()),
            is_draft: Set(req.is_draft),
            created_by: Set(created_by),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        apply_stats(&mut model, stats_of(&req.records));

        let sheet = model
            .insert(&txn)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("创建成绩表失败: {e}")))?;

        insert_records(&txn, sheet.id, &req.records).await?;

        txn.commit()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("提交事务失败: {e}")))?;

        self.get_grade_impl(sheet.id)
            .await?
            .ok_or_else(|| SchoolHubError::not_found("Grade not found after creation"))
    }

    pub async fn get_grade_impl(&self, grade_id: i64) -> Result<Option<GradeDetail>> {
        let Some(sheet) = Grades::find_by_id(grade_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询成绩表失败: {e}")))?
        else {
            return Ok(None);
        };

        let records = GradeRecords::find()
            .filter(grade_records::Column::GradeId.eq(grade_id))
            .order_by_asc(grade_records::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询成绩记录失败: {e}")))?;

        Ok(Some(GradeDetail {
            grade: sheet.into_grade(),
            records: records.into_iter().map(|r| r.into_record()).collect(),
        }))
    }

    pub async fn list_session_grades_impl(&self, session_id: i64) -> Result<Vec<Grade>> {
        let models = Grades::find()
            .filter(grades::Column::SessionId.eq(session_id))
            .filter(grades::Column::IsActive.eq(true))
            .order_by_desc(grades::Column::Date)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询成绩列表失败: {e}")))?;

        Ok(models.into_iter().map(|m| m.into_grade()).collect())
    }

    pub async fn list_teacher_grades_impl(&self, teacher_id: i64) -> Result<Vec<Grade>> {
        let session_ids: Vec<i64> = self
            .list_teacher_sessions_impl(teacher_id)
            .await?
            .into_iter()
            .map(|s| s.id)
            .collect();
        if session_ids.is_empty() {
            return Ok(vec![]);
        }

        let models = Grades::find()
            .filter(grades::Column::SessionId.is_in(session_ids))
            .filter(grades::Column::IsActive.eq(true))
            .order_by_desc(grades::Column::Date)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询成绩列表失败: {e}")))?;

        Ok(models.into_iter().map(|m| m.into_grade()).collect())
    }

    /// 更新成绩表，records 给出时整体替换并重算统计
    pub async fn update_grade_impl(
        &self,
        grade_id: i64,
        update: UpdateGradeRequest,
    ) -> Result<Option<GradeDetail>> {
        // 已删除的表不可修改
        let existing = Grades::find_by_id(grade_id)
            .filter(grades::Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询成绩表失败: {e}")))?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("开启事务失败: {e}")))?;

        let mut model = GradeActiveModel {
            id: Set(grade_id),
            updated_at: Set(now),
            ..Default::default()
        };
        if let Some(date) = update.date {
            model.date = Set(format_date(date));
        }
        if let Some(grade_type) = update.grade_type {
            model.grade_type = Set(grade_type.to_string());
        }
        if let Some(is_draft) = update.is_draft {
            model.is_draft = Set(is_draft);
        }

        if let Some(records) = update.records {
            GradeRecords::delete_many()
                .filter(grade_records::Column::GradeId.eq(grade_id))
                .exec(&txn)
                .await
                .map_err(|e| SchoolHubError::database_operation(format!("清除成绩记录失败: {e}")))?;
            insert_records(&txn, grade_id, &records).await?;
            apply_stats(&mut model, stats_of(&records));
        }

        model
            .update(&txn)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("更新成绩表失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("提交事务失败: {e}")))?;

        self.get_grade_impl(grade_id).await
    }

    pub async fn soft_delete_grade_impl(&self, grade_id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Grades::update_many()
            .col_expr(grades::Column::IsActive, sea_orm::sea_query::Expr::value(false))
            .col_expr(grades::Column::DeletedAt, sea_orm::sea_query::Expr::value(now))
            .col_expr(grades::Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
            .filter(grades::Column::Id.eq(grade_id))
            .filter(grades::Column::IsActive.eq(true))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("删除成绩表失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 学生在有效成绩表中的记录（含草稿，由汇总时过滤）
    pub async fn list_student_grades_impl(&self, student_id: i64) -> Result<Vec<StudentGradeEntry>> {
        let records = GradeRecords::find()
            .filter(grade_records::Column::StudentId.eq(student_id))
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询成绩记录失败: {e}")))?;
        if records.is_empty() {
            return Ok(vec![]);
        }

        let sheets = Grades::find()
            .filter(grades::Column::Id.is_in(records.iter().map(|r| r.grade_id)))
            .filter(grades::Column::IsActive.eq(true))
            .order_by_asc(grades::Column::Date)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询成绩表失败: {e}")))?;
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

        let by_sheet: HashMap<i64, grade_records::Model> =
            records.into_iter().map(|r| (r.grade_id, r)).collect();

        Ok(sheets
            .into_iter()
            .filter_map(|sheet| {
                let record = by_sheet.get(&sheet.id)?;
                let subject = *subjects.get(&sheet.session_id)?;
                let grade = sheet.into_grade();
                Some(StudentGradeEntry {
                    grade_id: grade.id,
                    session_id: grade.session_id,
                    subject,
                    date: grade.date,
                    grade_type: grade.grade_type,
                    value: record.value,
                    is_absent: record.is_absent,
                    is_draft: grade.is_draft,
                })
            })
            .collect())
    }

    /// 课时平均成绩：有效、非草稿且至少有一个有效分数的成绩表平均分的平均值
    pub async fn refresh_session_grade_stats_impl(&self, session_id: i64) -> Result<Option<f64>> {
        let sheets = Grades::find()
            .filter(grades::Column::SessionId.eq(session_id))
            .filter(grades::Column::IsActive.eq(true))
            .filter(grades::Column::IsDraft.eq(false))
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询成绩表失败: {e}")))?;

        // 表头的 stats_average 无法区分“全部无分数”和“平均 0 分”，因此从记录重算
        let mut per_sheet: HashMap<i64, Vec<(Option<f64>, bool)>> =
            sheets.iter().map(|s| (s.id, Vec::new())).collect();
        if !per_sheet.is_empty() {
            let records = GradeRecords::find()
                .filter(grade_records::Column::GradeId.is_in(sheets.iter().map(|s| s.id)))
                .all(&self.db)
                .await
                .map_err(|e| SchoolHubError::database_operation(format!("查询成绩记录失败: {e}")))?;
            for record in records {
                if let Some(values) = per_sheet.get_mut(&record.grade_id) {
                    values.push((record.value, record.is_absent));
                }
            }
        }

        let average = session_grade_average(per_sheet.into_values());
        let now = chrono::Utc::now().timestamp();

        CourseSessions::update_many()
            .col_expr(
                course_sessions::Column::StatsAverageGrade,
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
    use crate::models::grades::entities::GradeType;
    use crate::storage::sea_orm_storage::test_support::{memory_storage, seed_session};
    use chrono::NaiveDate;

    fn request(date: u32, records: Vec<GradeRecordInput>) -> CreateGradeRequest {
        CreateGradeRequest {
            date: NaiveDate::from_ymd_opt(2024, 12, date).unwrap(),
            grade_type: GradeType::Controle,
            is_draft: false,
            records,
        }
    }

    fn graded(student_id: i64, value: f64) -> GradeRecordInput {
        GradeRecordInput {
            student_id,
            value: Some(value),
            is_absent: false,
            comment: None,
        }
    }

    fn absent(student_id: i64) -> GradeRecordInput {
        GradeRecordInput {
            student_id,
            value: None,
            is_absent: true,
            comment: None,
        }
    }

    #[tokio::test]
    async fn test_session_grade_average_skips_all_absent_sheet() {
        let storage = memory_storage().await;
        let fx = seed_session(&storage).await;
        let [a, b] = [fx.student_ids[0], fx.student_ids[1]];

        storage
            .create_grade_impl(fx.session_id, fx.teacher_id, request(2, vec![graded(a, 12.0), graded(b, 16.0)]))
            .await
            .unwrap();
        let empty = storage
            .create_grade_impl(fx.session_id, fx.teacher_id, request(9, vec![absent(a), absent(b)]))
            .await
            .unwrap();
        assert_eq!(empty.grade.stats.average, 0.0);

        let average = storage.refresh_session_grade_stats_impl(fx.session_id).await.unwrap();
        assert_eq!(average, Some(14.0));
        let session = CourseSessions::find_by_id(fx.session_id)
            .one(&storage.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(session.stats_average_grade, Some(14.0));

        // 草稿不计入
        let mut draft = request(16, vec![graded(a, 2.0)]);
        draft.is_draft = true;
        storage
            .create_grade_impl(fx.session_id, fx.teacher_id, draft)
            .await
            .unwrap();
        let average = storage.refresh_session_grade_stats_impl(fx.session_id).await.unwrap();
        assert_eq!(average, Some(14.0));
    }

    #[tokio::test]
    async fn test_update_rejects_deleted_grade() {
        let storage = memory_storage().await;
        let fx = seed_session(&storage).await;
        let sheet = storage
            .create_grade_impl(fx.session_id, fx.teacher_id, request(2, vec![graded(fx.student_ids[0], 10.0)]))
            .await
            .unwrap();
        assert!(storage.soft_delete_grade_impl(sheet.grade.id).await.unwrap());

        let updated = storage
            .update_grade_impl(
                sheet.grade.id,
                UpdateGradeRequest {
                    records: Some(vec![graded(fx.student_ids[0], 20.0)]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(updated.is_none());
    }
}
