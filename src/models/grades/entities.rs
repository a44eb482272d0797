use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::courses::entities::Subject;

pub const MAX_GRADE_VALUE: f64 = 20.0;

// 评估类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub enum GradeType {
    Controle,
    Devoir,
    Examen,
    Oral,
}

impl std::fmt::Display for GradeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            GradeType::Controle => "controle",
            GradeType::Devoir => "devoir",
            GradeType::Examen => "examen",
            GradeType::Oral => "oral",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for GradeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "controle" => Ok(GradeType::Controle),
            "devoir" => Ok(GradeType::Devoir),
            "examen" => Ok(GradeType::Examen),
            "oral" => Ok(GradeType::Oral),
            _ => Err(format!("Invalid grade type: {s}")),
        }
    }
}

// 一次评估的统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeStats {
    pub average: f64,
    pub highest: f64,
    pub lowest: f64,
    pub absent_count: i32,
    pub total_students: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct Grade {
    pub id: i64,
    pub session_id: i64,
    pub date: NaiveDate,
    pub grade_type: GradeType,
    pub is_draft: bool,
    pub stats: GradeStats,
    pub created_by: i64,
    pub is_active: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeRecord {
    pub id: i64,
    pub grade_id: i64,
    pub student_id: i64,
    /// 缺考时为空
    pub value: Option<f64>,
    pub is_absent: bool,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub grade: Grade,
    pub records: Vec<GradeRecord>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct StudentGradeEntry {
    pub grade_id: i64,
    pub session_id: i64,
    pub subject: Subject,
    pub date: NaiveDate,
    pub grade_type: GradeType,
    pub value: Option<f64>,
    pub is_absent: bool,
    pub is_draft: bool,
}
