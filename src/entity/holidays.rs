use sea_orm::entity::prelude::*;

use super::{parse_date, to_datetime};
use crate::models::calendar::entities::{Holiday, HolidayPeriod, HolidayType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "holidays")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub academic_year: String,
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub holiday_type: String,
    pub is_active: bool,
    pub updated_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn period(&self) -> HolidayPeriod {
        HolidayPeriod {
            name: self.name.clone(),
            start_date: parse_date(&self.start_date),
            end_date: parse_date(&self.end_date),
            holiday_type: self.holiday_type.parse().unwrap_or(HolidayType::Regular),
        }
    }

    pub fn into_holiday(self) -> Holiday {
        Holiday {
            id: self.id,
            period: self.period(),
            academic_year: self.academic_year,
            is_active: self.is_active,
            updated_by: self.updated_by,
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
