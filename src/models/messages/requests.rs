use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/message.ts")]
pub struct SendMessageRequest {
    pub recipient_ids: Vec<i64>,
    pub subject: String,
    pub body: String,
    pub parent_id: Option<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/message.ts")]
pub struct MailboxParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default)]
    pub unread_only: bool,
}

// 用于存储层
#[derive(Debug, Clone, Default)]
pub struct MailboxQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub unread_only: bool,
}

impl From<MailboxParams> for MailboxQuery {
    fn from(params: MailboxParams) -> Self {
        Self {
            page: Some(params.pagination.page),
            size: Some(params.pagination.size),
            unread_only: params.unread_only,
        }
    }
}
