use sea_orm::entity::prelude::*;

use super::to_datetime;
use crate::models::calendar::entities::{ScheduleConfig, SchedulePeriod};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "schedule_configs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub academic_year: String,
    pub is_active: bool,
    pub updated_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::schedule_periods::Entity")]
    Periods,
}

impl Related<super::schedule_periods::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Periods.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_config(self, periods: Vec<SchedulePeriod>) -> ScheduleConfig {
        ScheduleConfig {
            id: self.id,
            academic_year: self.academic_year,
            is_active: self.is_active,
            updated_by: self.updated_by,
            periods,
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
