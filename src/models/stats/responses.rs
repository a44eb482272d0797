use chrono::NaiveDate;
use serde::Serialize;
use ts_rs::TS;

use super::entities::{
    AgeStats, AttendanceSummary, BehaviorSummary, DuplicateSheetGroup, GenderDistribution,
    GradeSummary, HighRiskStudent, HighRiskSummary, MissingAttendance, StudentStats,
};

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/stats.ts")]
pub struct StudentStatsResponse {
    pub student_id: i64,
    pub attendance: AttendanceSummary,
    pub behavior: BehaviorSummary,
    pub grades: GradeSummary,
    pub persisted: Option<StudentStats>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/stats.ts")]
pub struct TeacherStatsResponse {
    pub teacher_id: i64,
    pub total_students: i32,
    pub gender_distribution: GenderDistribution,
    pub age: Option<AgeStats>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/stats.ts")]
pub struct GlobalStatsResponse {
    pub total_students: i64,
    pub total_teachers: i64,
    pub average_presence_rate: f64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/stats.ts")]
pub struct HighRiskResponse {
    pub items: Vec<HighRiskStudent>,
    pub summary: HighRiskSummary,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/stats.ts")]
pub struct DuplicateAttendanceResponse {
    pub total: i32,
    pub groups: Vec<DuplicateSheetGroup>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/stats.ts")]
pub struct MissingAttendanceResponse {
    pub teacher_id: i64,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub total_missing: i32,
    pub items: Vec<MissingAttendance>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/stats.ts")]
pub struct RefreshStatsResponse {
    pub students_updated: i32,
    pub sessions_updated: i32,
}
