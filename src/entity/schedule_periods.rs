use sea_orm::entity::prelude::*;

use crate::models::calendar::entities::{PeriodType, SchedulePeriod};
use crate::models::courses::entities::TimeSlotDay;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "schedule_periods")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub config_id: i64,
    pub day: String,
    pub start_time: String,
    pub end_time: String,
    pub order_number: i32,
    pub period_type: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::schedule_configs::Entity",
        from = "Column::ConfigId",
        to = "super::schedule_configs::Column::Id",
        on_delete = "Cascade"
    )]
    Config,
}

impl Related<super::schedule_configs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Config.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_period(self) -> SchedulePeriod {
        SchedulePeriod {
            day: self.day.parse().unwrap_or(TimeSlotDay::SaturdayMorning),
            start_time: self.start_time,
            end_time: self.end_time,
            order_number: self.order_number,
            period_type: self.period_type.parse().unwrap_or(PeriodType::Class),
        }
    }
}
