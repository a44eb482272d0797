use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::courses::entities::{Subject, TimeSlotDay};

// 持久化的学生统计，写考勤/表现/成绩后重新计算
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/stats.ts")]
pub struct StudentStats {
    pub student_id: i64,
    pub absences_count: i32,
    pub absences_rate: f64,
    pub behavior_average: f64,
    pub grade_average: Option<f64>,
    pub last_activity: Option<NaiveDate>,
    pub last_update: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/stats.ts")]
pub struct AbsenceEntry {
    pub date: NaiveDate,
    pub session_id: i64,
    pub subject: Subject,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/stats.ts")]
pub struct AttendanceSummary {
    pub total_sessions: i32,
    pub present: i32,
    pub absences: Vec<AbsenceEntry>,
    /// 出勤率百分比，两位小数
    pub attendance_rate: f64,
    pub last_activity: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/stats.ts")]
pub struct BehaviorSummary {
    pub total_sessions: i32,
    pub average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/stats.ts")]
pub struct SubjectAverage {
    pub subject: Subject,
    pub average: f64,
    pub count: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/stats.ts")]
pub struct GradeSummary {
    pub subjects: Vec<SubjectAverage>,
    pub overall_average: Option<f64>,
}

// 分布中的一档，百分比按两位小数格式化
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/stats.ts")]
pub struct DistributionBucket {
    pub count: i32,
    pub percentage: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/stats.ts")]
pub struct GenderDistribution {
    pub masculin: DistributionBucket,
    pub feminin: DistributionBucket,
    pub undefined: DistributionBucket,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/stats.ts")]
pub struct AgeStats {
    pub min: u32,
    pub max: u32,
    pub average: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/stats.ts")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/stats.ts")]
pub struct HighRiskStudent {
    pub student_id: i64,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub absences_count: i32,
    pub risk_level: RiskLevel,
    pub last_absence_date: Option<NaiveDate>,
    pub days_since_last_absence: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/stats.ts")]
pub struct HighRiskSummary {
    pub total: i32,
    pub high: i32,
    pub medium: i32,
    pub low: i32,
    pub total_absences: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/stats.ts")]
pub struct DuplicateSheetGroup {
    pub session_id: i64,
    pub date: NaiveDate,
    pub sheet_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/stats.ts")]
pub struct MissingAttendance {
    pub session_id: i64,
    pub subject: Subject,
    pub level: String,
    pub day: TimeSlotDay,
    pub dates: Vec<NaiveDate>,
}
