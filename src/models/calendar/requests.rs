use super::entities::{HolidayPeriod, SchedulePeriod};
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/calendar.ts")]
pub struct SaveHolidaysRequest {
    pub academic_year: Option<String>,
    pub holidays: Vec<HolidayPeriod>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/calendar.ts")]
pub struct SaveScheduleRequest {
    pub academic_year: Option<String>,
    pub periods: Vec<SchedulePeriod>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/calendar.ts")]
pub struct HolidayListQuery {
    pub academic_year: Option<String>,
}
