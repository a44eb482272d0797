use super::entities::{Attendance, StudentAttendanceEntry};
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceListResponse {
    pub items: Vec<Attendance>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct StudentAttendanceHistoryResponse {
    pub student_id: i64,
    pub items: Vec<StudentAttendanceEntry>,
}
