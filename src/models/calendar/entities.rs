use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::courses::entities::TimeSlotDay;

// 假期类型：常规学校假期 / 特殊日子（宗教节日、校庆等）
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "../frontend/src/types/generated/calendar.ts")]
pub enum HolidayType {
    Regular,
    Special,
}

impl std::fmt::Display for HolidayType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HolidayType::Regular => write!(f, "REGULAR"),
            HolidayType::Special => write!(f, "SPECIAL"),
        }
    }
}

impl std::str::FromStr for HolidayType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "REGULAR" => Ok(HolidayType::Regular),
            "SPECIAL" => Ok(HolidayType::Special),
            _ => Err(format!("Invalid holiday type: {s}")),
        }
    }
}

// 假期区间（闭区间）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/calendar.ts")]
pub struct HolidayPeriod {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub holiday_type: HolidayType,
}

impl HolidayPeriod {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/calendar.ts")]
pub struct Holiday {
    pub id: i64,
    #[serde(flatten)]
    #[ts(flatten)]
    pub period: HolidayPeriod,
    pub academic_year: String,
    pub is_active: bool,
    pub updated_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/calendar.ts")]
pub enum PeriodType {
    Class,
    Break,
}

impl std::fmt::Display for PeriodType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PeriodType::Class => write!(f, "class"),
            PeriodType::Break => write!(f, "break"),
        }
    }
}

impl std::str::FromStr for PeriodType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "class" => Ok(PeriodType::Class),
            "break" => Ok(PeriodType::Break),
            _ => Err(format!("Invalid period type: {s}")),
        }
    }
}

// 作息时间表中的一节
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/calendar.ts")]
pub struct SchedulePeriod {
    pub day: TimeSlotDay,
    pub start_time: String,
    pub end_time: String,
    pub order_number: i32,
    pub period_type: PeriodType,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/calendar.ts")]
pub struct ScheduleConfig {
    pub id: i64,
    pub academic_year: String,
    pub is_active: bool,
    pub updated_by: Option<i64>,
    pub periods: Vec<SchedulePeriod>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
