use super::entities::{Behavior, StudentBehaviorEntry};
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/behavior.ts")]
pub struct BehaviorListResponse {
    pub items: Vec<Behavior>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/behavior.ts")]
pub struct StudentBehaviorHistoryResponse {
    pub student_id: i64,
    pub items: Vec<StudentBehaviorEntry>,
}
