use chrono::NaiveDate;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceRecordInput {
    pub student_id: i64,
    pub is_present: bool,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct CreateAttendanceRequest {
    pub date: NaiveDate,
    pub records: Vec<AttendanceRecordInput>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct UpdateAttendanceRequest {
    pub records: Vec<AttendanceRecordInput>,
}

// date 与 today 同时给出时以 date 为准
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceQuery {
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub today: bool,
    #[serde(default)]
    pub include_inactive: bool,
}
