use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::common::{PaginationInfo, PaginationQuery};

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct HealthResponse {
    pub status: String,
    pub system_name: String,
    pub version: String,
    pub started_at: DateTime<Utc>,
    pub uptime_seconds: i64,
}

// 登录尝试日志
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct ConnectionLog {
    pub id: i64,
    pub user_id: Option<i64>,
    pub email: String,
    pub success: bool,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewConnectionLog {
    pub user_id: Option<i64>,
    pub email: String,
    pub success: bool,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct ConnectionLogParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub user_id: Option<i64>,
    pub success: Option<bool>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct ConnectionLogListResponse {
    pub items: Vec<ConnectionLog>,
    pub pagination: PaginationInfo,
}
