use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::courses::entities::Subject;

// 考勤表：一个课时在某一天的点名
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct Attendance {
    pub id: i64,
    pub session_id: i64,
    pub date: NaiveDate,
    /// 百分比 0-100
    pub presence_rate: f64,
    pub total_students: i32,
    pub created_by: i64,
    pub is_active: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub last_update: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceRecord {
    pub id: i64,
    pub attendance_id: i64,
    pub student_id: i64,
    pub is_present: bool,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub attendance: Attendance,
    pub records: Vec<AttendanceRecord>,
}

// 某学生在一张考勤表中的记录
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct StudentAttendanceEntry {
    pub attendance_id: i64,
    pub session_id: i64,
    pub subject: Subject,
    pub date: NaiveDate,
    pub is_present: bool,
    pub comment: Option<String>,
    pub last_update: DateTime<Utc>,
}
