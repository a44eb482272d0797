use super::entities::{Holiday, HolidayPeriod, SchedulePeriod};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/calendar.ts")]
pub struct HolidayListResponse {
    pub items: Vec<Holiday>,
}

// is_default 为 true 表示该学年尚未保存配置，返回内置默认值
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/calendar.ts")]
pub struct CurrentHolidaysResponse {
    pub academic_year: String,
    pub is_default: bool,
    pub items: Vec<HolidayPeriod>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/calendar.ts")]
pub struct CurrentScheduleResponse {
    pub academic_year: String,
    pub is_default: bool,
    pub config_id: Option<i64>,
    pub periods: Vec<SchedulePeriod>,
}
