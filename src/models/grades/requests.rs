use super::entities::GradeType;
use chrono::NaiveDate;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeRecordInput {
    pub student_id: i64,
    pub value: Option<f64>,
    #[serde(default)]
    pub is_absent: bool,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct CreateGradeRequest {
    pub date: NaiveDate,
    pub grade_type: GradeType,
    #[serde(default)]
    pub is_draft: bool,
    pub records: Vec<GradeRecordInput>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct UpdateGradeRequest {
    pub date: Option<NaiveDate>,
    pub grade_type: Option<GradeType>,
    pub is_draft: Option<bool>,
    pub records: Option<Vec<GradeRecordInput>>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeQuery {
    /// 只返回统计，不返回明细
    #[serde(default)]
    pub stats_only: bool,
}
