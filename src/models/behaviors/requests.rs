use chrono::NaiveDate;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/behavior.ts")]
pub struct BehaviorRecordInput {
    pub student_id: i64,
    pub rating: i32,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/behavior.ts")]
pub struct CreateBehaviorRequest {
    pub date: NaiveDate,
    pub records: Vec<BehaviorRecordInput>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/behavior.ts")]
pub struct UpdateBehaviorRequest {
    pub records: Vec<BehaviorRecordInput>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/behavior.ts")]
pub struct BehaviorQuery {
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub today: bool,
    #[serde(default)]
    pub include_inactive: bool,
}
