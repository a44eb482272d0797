use super::entities::{InboxItem, Message, MessageDetail, SentItem};
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/message.ts")]
pub struct InboxResponse {
    pub items: Vec<InboxItem>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/message.ts")]
pub struct SentResponse {
    pub items: Vec<SentItem>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/message.ts")]
pub struct UnreadCountResponse {
    pub unread: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/message.ts")]
pub struct ThreadResponse {
    pub root: MessageDetail,
    pub replies: Vec<Message>,
}
