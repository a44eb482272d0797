use super::entities::FeeDetail;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct FeeListResponse {
    pub items: Vec<FeeDetail>,
    pub amount_due_total: f64,
    pub paid_total: f64,
}
