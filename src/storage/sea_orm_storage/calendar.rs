//! 假期与作息时间表存储操作

use super::SeaOrmStorage;
use crate::entity::prelude::*;
use crate::entity::{format_date, holidays, schedule_configs, schedule_periods};
use crate::errors::{Result, SchoolHubError};
use crate::models::calendar::entities::{Holiday, HolidayPeriod, ScheduleConfig, SchedulePeriod};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

impl SeaOrmStorage {
    pub async fn list_holidays_impl(&self, academic_year: Option<String>) -> Result<Vec<Holiday>> {
        let mut select = Holidays::find();
        if let Some(year) = academic_year {
            select = select.filter(holidays::Column::AcademicYear.eq(year));
        }

        let models = select
            .order_by_desc(holidays::Column::AcademicYear)
            .order_by_asc(holidays::Column::StartDate)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询假期失败: {e}")))?;

        Ok(models.into_iter().map(|m| m.into_holiday()).collect())
    }

    pub async fn list_active_holidays_impl(&self, academic_year: &str) -> Result<Vec<Holiday>> {
        let models = Holidays::find()
            .filter(holidays::Column::AcademicYear.eq(academic_year))
            .filter(holidays::Column::IsActive.eq(true))
            .order_by_asc(holidays::Column::StartDate)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询假期失败: {e}")))?;

        Ok(models.into_iter().map(|m| m.into_holiday()).collect())
    }

    /// 停用该学年已有假期，再写入新的一组
    pub async fn replace_holidays_impl(
        &self,
        academic_year: &str,
        periods: Vec<HolidayPeriod>,
        updated_by: i64,
    ) -> Result<Vec<Holiday>> {
        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("开启事务失败: {e}")))?;

        Holidays::update_many()
            .col_expr(holidays::Column::IsActive, sea_orm::sea_query::Expr::value(false))
            .col_expr(holidays::Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
            .filter(holidays::Column::AcademicYear.eq(academic_year))
            .filter(holidays::Column::IsActive.eq(true))
            .exec(&txn)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("停用假期失败: {e}")))?;

        for period in periods {
            HolidayActiveModel {
                academic_year: Set(academic_year.to_string()),
                name: Set(period.name),
                start_date: Set(format_date(period.start_date)),
                end_date: Set(format_date(period.end_date)),
                holiday_type: Set(period.holiday_type.to_string()),
                is_active: Set(true),
                updated_by: Set(Some(updated_by)),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("写入假期失败: {e}")))?;
        }

        txn.commit()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("提交事务失败: {e}")))?;

        self.list_active_holidays_impl(academic_year).await
    }

    /// 最新的有效作息表
    pub async fn get_active_schedule_impl(
        &self,
        academic_year: &str,
    ) -> Result<Option<ScheduleConfig>> {
        let Some(config) = ScheduleConfigs::find()
            .filter(schedule_configs::Column::AcademicYear.eq(academic_year))
            .filter(schedule_configs::Column::IsActive.eq(true))
            .order_by_desc(schedule_configs::Column::UpdatedAt)
            .order_by_desc(schedule_configs::Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询作息表失败: {e}")))?
        else {
            return Ok(None);
        };

        let periods = SchedulePeriods::find()
            .filter(schedule_periods::Column::ConfigId.eq(config.id))
            .order_by_asc(schedule_periods::Column::Day)
            .order_by_asc(schedule_periods::Column::OrderNumber)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询作息时段失败: {e}")))?;

        Ok(Some(config.into_config(
            periods.into_iter().map(|p| p.into_period()).collect(),
        )))
    }

    /// 停用该学年已有作息表，再写入新的一份
    pub async fn replace_schedule_impl(
        &self,
        academic_year: &str,
        periods: Vec<SchedulePeriod>,
        updated_by: i64,
    ) -> Result<ScheduleConfig> {
        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("开启事务失败: {e}")))?;

        ScheduleConfigs::update_many()
            .col_expr(
                schedule_configs::Column::IsActive,
                sea_orm::sea_query::Expr::value(false),
            )
            .col_expr(schedule_configs::Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
            .filter(schedule_configs::Column::AcademicYear.eq(academic_year))
            .filter(schedule_configs::Column::IsActive.eq(true))
            .exec(&txn)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("停用作息表失败: {e}")))?;

        let config = ScheduleConfigActiveModel {
            academic_year: Set(academic_year.to_string()),
            is_active: Set(true),
            updated_by: Set(Some(updated_by)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| SchoolHubError::database_operation(format!("创建作息表失败: {e}")))?;

        for period in periods {
            SchedulePeriodActiveModel {
                config_id: Set(config.id),
                day: Set(period.day.to_string()),
                start_time: Set(period.start_time),
                end_time: Set(period.end_time),
                order_number: Set(period.order_number),
                period_type: Set(period.period_type.to_string()),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("写入作息时段失败: {e}")))?;
        }

        txn.commit()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("提交事务失败: {e}")))?;

        self.get_active_schedule_impl(academic_year)
            .await?
            .ok_or_else(|| SchoolHubError::not_found("Schedule not found after saving"))
    }
}
