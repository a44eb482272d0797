//! 学生统计存储操作

use super::SeaOrmStorage;
use crate::entity::prelude::*;
use crate::entity::{format_date, student_stats};
use crate::errors::{Result, SchoolHubError};
use crate::models::stats::entities::StudentStats;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 写入或覆盖学生统计
    pub async fn upsert_student_stats_impl(&self, stats: StudentStats) -> Result<()> {
        let existing = StudentStatsTable::find_by_id(stats.student_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询学生统计失败: {e}")))?;

        let model = StudentStatsActiveModel {
            student_id: Set(stats.student_id),
            absences_count: Set(stats.absences_count),
            absences_rate: Set(stats.absences_rate),
            behavior_average: Set(stats.behavior_average),
            grade_average: Set(stats.grade_average),
            last_activity: Set(stats.last_activity.map(format_date)),
            last_update: Set(stats.last_update.timestamp()),
        };

        if existing.is_some() {
            model
                .update(&self.db)
                .await
                .map_err(|e| SchoolHubError::database_operation(format!("更新学生统计失败: {e}")))?;
        } else {
            model
                .insert(&self.db)
                .await
                .map_err(|e| SchoolHubError::database_operation(format!("写入学生统计失败: {e}")))?;
        }
        Ok(())
    }

    pub async fn get_student_stats_impl(&self, student_id: i64) -> Result<Option<StudentStats>> {
        let model = StudentStatsTable::find_by_id(student_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询学生统计失败: {e}")))?;
        Ok(model.map(|m| m.into_stats()))
    }

    pub async fn list_absent_student_stats_impl(&self) -> Result<Vec<StudentStats>> {
        let models = StudentStatsTable::find()
            .filter(student_stats::Column::AbsencesCount.gt(0))
            .order_by_desc(student_stats::Column::AbsencesCount)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询学生统计失败: {e}")))?;
        Ok(models.into_iter().map(|m| m.into_stats()).collect())
    }
}
