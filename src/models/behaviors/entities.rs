use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::courses::entities::Subject;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

// 课堂表现表
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/behavior.ts")]
pub struct Behavior {
    pub id: i64,
    pub session_id: i64,
    pub date: NaiveDate,
    /// 本次平均评分
    pub behavior_rate: f64,
    pub total_students: i32,
    pub created_by: i64,
    pub is_active: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub last_update: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/behavior.ts")]
pub struct BehaviorRecord {
    pub id: i64,
    pub behavior_id: i64,
    pub student_id: i64,
    pub rating: i32,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/behavior.ts")]
pub struct BehaviorDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub behavior: Behavior,
    pub records: Vec<BehaviorRecord>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/behavior.ts")]
pub struct StudentBehaviorEntry {
    pub behavior_id: i64,
    pub session_id: i64,
    pub subject: Subject,
    pub date: NaiveDate,
    pub rating: i32,
    pub comment: Option<String>,
    pub last_update: DateTime<Utc>,
}
