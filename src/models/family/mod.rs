use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::courses::entities::CourseSession;
use crate::models::fees::entities::FeeDetail;
use crate::models::stats::entities::{AttendanceSummary, StudentStats};
use crate::models::users::entities::User;

// 管理员可通过 email 查看任意家庭
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/family.ts")]
pub struct FamilyQuery {
    pub email: Option<String>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/family.ts")]
pub struct FamilyChild {
    pub student: User,
    pub sessions: Vec<CourseSession>,
    pub stats: Option<StudentStats>,
    pub attendance: AttendanceSummary,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/family.ts")]
pub struct FamilyDashboardResponse {
    pub email: String,
    pub children: Vec<FamilyChild>,
    // 家庭的有效缴费
    pub fees: Vec<FeeDetail>,
}
